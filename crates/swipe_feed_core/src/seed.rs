//! crates/swipe_feed_core/src/seed.rs
//!
//! Placeholder cards shown before the viewer's identity resolves.

use crate::domain::Card;

#[allow(clippy::too_many_arguments)]
fn placeholder(
    id: &str,
    name: &str,
    age: u32,
    bio: &str,
    image: &str,
    job_title: &str,
    location: &str,
    skills: &[&str],
) -> Card {
    Card {
        id: id.to_string(),
        name: name.to_string(),
        bio: bio.to_string(),
        images: vec![image.to_string()],
        job_title: Some(job_title.to_string()),
        location: Some(location.to_string()),
        age: Some(age),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

/// The sample deck used to pre-seed a feed.
pub fn placeholder_cards() -> Vec<Card> {
    vec![
        placeholder(
            "placeholder-1",
            "Sarah Johnson",
            28,
            "Front-end developer focused on responsive UI work in React and Tailwind CSS.",
            "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=400",
            "Front-end Developer",
            "San Francisco, CA",
            &["React", "Tailwind CSS", "TypeScript", "UI/UX"],
        ),
        placeholder(
            "placeholder-2",
            "Emily Carter",
            26,
            "Full-stack developer building applications on the MERN stack.",
            "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=400",
            "Full-Stack Developer",
            "New York, NY",
            &["MongoDB", "Express", "React", "Node.js"],
        ),
        placeholder(
            "placeholder-3",
            "Jessica Miller",
            29,
            "Product designer working on design systems and user research.",
            "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=400",
            "UI/UX Designer",
            "Los Angeles, CA",
            &["Figma", "Prototyping", "Design Systems", "User Research"],
        ),
        placeholder(
            "placeholder-4",
            "Alex Brown",
            27,
            "Backend engineer building secure APIs on cloud infrastructure.",
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400",
            "Software Engineer",
            "Seattle, WA",
            &["Node.js", "AWS", "Docker", "PostgreSQL"],
        ),
        placeholder(
            "placeholder-5",
            "Morgan Lee",
            25,
            "Mobile developer shipping React Native apps backed by Firebase.",
            "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=400",
            "React Native Developer",
            "Portland, OR",
            &["React Native", "Firebase", "Expo", "JavaScript"],
        ),
    ]
}
