//! The profile document the assistant is grounded on.
//!
//! Built once from constants and prefixed to every outbound request as the
//! system instruction. Nothing here is ever mutated.

use std::sync::OnceLock;

use serde::Serialize;

pub const ASSISTANT_PERSONA: &str = "You are an AI portfolio assistant for Arthony Kanjira, a Computer Engineering finalist. Your role is to provide concise, technical, and accurate information about his projects, skills, experience, and professional details. Only provide information directly related to him; do not answer unrelated questions. If asked trivial questions (like '1+1') or anything unrelated, redirect politely, stating your job is to provide information about Arthony only.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub education: &'static str,
    pub skills: Skills,
    pub projects: &'static [ProfileProject],
    pub experience: &'static [&'static str],
    pub response_constraints: ResponseConstraints,
}

#[derive(Debug, Serialize)]
pub struct Skills {
    pub languages: &'static [&'static str],
    pub frameworks: &'static [&'static str],
    pub databases: &'static [&'static str],
    pub tools: &'static [&'static str],
    pub other: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct ProfileProject {
    pub name: &'static str,
    pub description: &'static str,
    pub stack: &'static [&'static str],
    pub notes: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ResponseConstraints {
    pub tone: &'static str,
    pub rules: &'static [&'static str],
}

pub static PROFILE: Profile = Profile {
    name: "Arthony Kanjira",
    phone: "+265885620896",
    email: "arthontkanjira444@gmail.com",
    education: "Final year, BSc Computer Engineering, University of Livingstonia",
    skills: Skills {
        languages: &["Python", "PHP", "Java", "C", "C++", "JavaScript", "HTML", "CSS", "XML"],
        frameworks: &["React", "Next.js", "Tailwind CSS", "Node.js"],
        databases: &["MySQL", "PostgreSQL", "Supabase"],
        tools: &["Docker", "Git", "Linux"],
        other: &["3D graphics with Three.js", "Canvas API", "AI model integration", "Payment systems"],
    },
    projects: &[
        ProfileProject {
            name: "Crop Advisory App",
            description: "A smart AI-driven agriculture assistant, predicting yields and detecting pests with surgical precision. Weather API integration ensures farmers get live, actionable insights.",
            stack: &["Python", "React", "Node.js", "PostgreSQL", "Tailwind CSS", "JavaScript"],
            notes: "Full-stack AI integration; a farmer’s secret weapon.",
        },
        ProfileProject {
            name: "Pharma-Core (Pharmacy Management System)",
            description: "Sleek, secure, and efficient pharmacy management. Handles inventory, sales, and users while gracefully integrating payment gateways.",
            stack: &["Python", "PHP", "Node.js", "MySQL", "React", "Tailwind CSS"],
            notes: "Streamlined operations for pharmacies, production-ready.",
        },
        ProfileProject {
            name: "Local News Website",
            description: "A clean, responsive hub delivering timely news. Engages readers while managing content seamlessly in the cloud.",
            stack: &["HTML", "CSS", "JavaScript", "Tailwind CSS", "React", "Node.js", "Supabase"],
            notes: "Modern full-stack approach, fully mobile-ready.",
        },
        ProfileProject {
            name: "Car Booking Application",
            description: "Effortless ride-booking platform with instant confirmations and secure payments. Sleek UX keeps users coming back.",
            stack: &["React", "PHP", "Node.js", "MySQL", "Tailwind CSS"],
            notes: "Full-stack app; optimized for speed and reliability.",
        },
        ProfileProject {
            name: "E-commerce App",
            description: "Shopping made simple. Java & XML power a robust Android platform with smooth cart and order management.",
            stack: &["Java", "XML", "SQLite", "Node.js"],
            notes: "Responsive, mobile-first design with intuitive flows.",
        },
        ProfileProject {
            name: "Lost and Found Website (Unilia)",
            description: "Quickly post or locate lost items. Elegant design meets cloud storage for instant tracking.",
            stack: &["HTML", "CSS", "JavaScript", "Node.js", "Supabase", "GitHub Pages"],
            notes: "Lightweight, modern, and super accessible.",
        },
        ProfileProject {
            name: "3D Racing Game",
            description: "High-octane 3D racing fun using Three.js. Realistic physics and immersive tracks for an adrenaline rush.",
            stack: &["Three.js", "HTML", "CSS", "JavaScript", "Node.js"],
            notes: "Interactive 3D gameplay; browser-ready excitement.",
        },
        ProfileProject {
            name: "Flappy Bird Clone",
            description: "Classic arcade joy, cloned with canvas API and custom physics. Addictive gameplay, minimal footprint.",
            stack: &["JavaScript", "Canvas API", "HTML", "CSS", "Node.js"],
            notes: "Perfect blend of nostalgia and web tech.",
        },
        ProfileProject {
            name: "Voice-to-Speech PC Controller",
            description: "Command your PC with your voice. AI-powered speech recognition translates words into seamless system actions.",
            stack: &["Python", "JavaScript", "Node.js", "API integrations"],
            notes: "Futuristic interaction meets practical utility.",
        },
    ],
    experience: &[
        "Full-stack development with AI integration",
        "Payment system architecture and deployment",
        "Software architecture and security considerations",
        "Cross-platform web and game development",
    ],
    response_constraints: ResponseConstraints {
        tone: "Technical, concise, helpful, ≤80 words per response, forward-thinking, practical; subtle playful or lyrical touches allowed.",
        rules: &[
            "Do not provide speculative answers",
            "Do not answer unrelated questions",
            "Redirect trivial questions politely to Arthony-related info only",
        ],
    },
};

/// Persona, serialized profile and response constraints joined into the
/// system text sent with every request. Computed once.
pub fn system_instruction() -> &'static str {
    static INSTRUCTION: OnceLock<String> = OnceLock::new();
    INSTRUCTION.get_or_init(|| compose_instruction(ASSISTANT_PERSONA, &PROFILE))
}

fn compose_instruction(persona: &str, profile: &Profile) -> String {
    // Serializing plain &'static str data cannot fail
    let profile_json = serde_json::to_string(profile).unwrap_or_default();
    let constraints_json = serde_json::to_string(&profile.response_constraints).unwrap_or_default();

    format!(
        "{}\n\nHere is {}'s detailed profile: {}\n\nConstraints: {}",
        persona, profile.name, profile_json, constraints_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_starts_with_persona() {
        assert!(system_instruction().starts_with(ASSISTANT_PERSONA));
    }

    #[test]
    fn test_instruction_embeds_profile_and_constraints() {
        let text = system_instruction();
        assert!(text.contains("Here is Arthony Kanjira's detailed profile: {\"name\":\"Arthony Kanjira\""));
        assert!(text.contains("\"responseConstraints\":{\"tone\""));
        assert!(text.contains("\n\nConstraints: {\"tone\":"));
    }

    #[test]
    fn test_instruction_is_built_once() {
        let a = system_instruction();
        let b = system_instruction();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_profile_lists_every_project() {
        let json: serde_json::Value = serde_json::to_value(&PROFILE).unwrap();
        assert_eq!(json["projects"].as_array().unwrap().len(), 9);
        assert_eq!(json["skills"]["databases"][2], "Supabase");
    }
}
