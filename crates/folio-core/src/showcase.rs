//! Constant tables behind the portfolio screens.

pub struct SkillCategory {
    pub category: &'static str,
    pub items: &'static [&'static str],
}

pub struct Principle {
    pub title: &'static str,
    pub description: &'static str,
}

/// A case study shown on the projects screen
pub struct CaseStudy {
    pub id: &'static str,
    pub title: &'static str,
    pub role: &'static str,
    pub outcome: &'static str,
    pub constraint: &'static str,
    pub architecture: &'static str,
    pub tech: &'static [&'static str],
    pub link: &'static str,
}

pub const SKILLS: &[SkillCategory] = &[
    SkillCategory { category: "Languages", items: &["Python", "PHP", "JavaScript", "TypeScript", "C++"] },
    SkillCategory { category: "Frameworks", items: &["Next.js", "React", "FastAPI", "Laravel", "Tailwind"] },
    SkillCategory { category: "Infrastructure", items: &["Docker", "Linux", "MySQL", "PostgreSQL", "Git"] },
    SkillCategory { category: "Intelligence", items: &["Scikit-Learn", "Pandas"] },
];

pub const PRINCIPLES: &[Principle] = &[
    Principle {
        title: "Constraints First",
        description: "I don't write a line of code until I understand the bandwidth, the data volume, and the user's hardware.",
    },
    Principle {
        title: "Fault Tolerance",
        description: "Happy paths are easy. I design for the 1% of the time when the API fails or the network drops.",
    },
    Principle {
        title: "Simplicity Scaling",
        description: "Complexity is tech debt. I prefer a boring, robust solution over a clever, fragile one.",
    },
];

pub const CASE_STUDIES: &[CaseStudy] = &[
    CaseStudy {
        id: "01",
        title: "Crop Advisory Intelligence",
        role: "ML ARCHITECTURE",
        outcome: "94% Yield Prediction Accuracy",
        constraint: "Must run effectively in rural areas with intermittent connectivity and noisy weather data.",
        architecture: "FastAPI serving a Random Forest model. Implemented offline-first caching via Next.js service workers.",
        tech: &["Python", "FastAPI", "Next.js"],
        link: "https://crop-advisory-delta.vercel.app",
    },
    CaseStudy {
        id: "02",
        title: "Pharma-Core Engine",
        role: "SYSTEMS ARCHITECT",
        outcome: "40% Reduction in Stock Waste",
        constraint: "High-concurrency retail environment where inventory race conditions cause financial loss.",
        architecture: "Relational database design with strict row-level locking. Implemented RBAC to prevent unauthorized overrides.",
        tech: &["PHP", "MySQL", "Tailwind"],
        link: "https://next-level.gt.tc",
    },
    CaseStudy {
        id: "03",
        title: "Voice of Livingstonia",
        role: "PLATFORM LEAD",
        outcome: "University-Wide Adoption",
        constraint: "Need for a censorship-resistant news platform that handles spikes in traffic during campus events.",
        architecture: "Custom CMS with optimized query caching. Decoupled frontend delivery from backend logic.",
        tech: &["PHP", "MySQL"],
        link: "https://github.com/AK47GT18/VoL-BEHIND-.git",
    },
];
