use serde::{Deserialize, Serialize};

/// One of the four fixed resume regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Education,
    Experience,
    Projects,
    Skills,
}

impl Section {
    /// Iteration order used when a header matches keywords of several sections.
    pub const ALL: [Section; 4] = [
        Section::Education,
        Section::Experience,
        Section::Projects,
        Section::Skills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Education => "education",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Skills => "skills",
        }
    }
}

/// Section name → accumulated section text. All four keys are always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionMap {
    pub education: String,
    pub experience: String,
    pub projects: String,
    pub skills: String,
}

impl SectionMap {
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::Education => &self.education,
            Section::Experience => &self.experience,
            Section::Projects => &self.projects,
            Section::Skills => &self.skills,
        }
    }

    fn get_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::Education => &mut self.education,
            Section::Experience => &mut self.experience,
            Section::Projects => &mut self.projects,
            Section::Skills => &mut self.skills,
        }
    }

    /// Appends a content line followed by a single space.
    pub fn append_line(&mut self, section: Section, line: &str) {
        let bucket = self.get_mut(section);
        bucket.push_str(line);
        bucket.push(' ');
    }

    /// The text skill extraction looks at: skills, experience and projects, space-joined.
    pub fn skill_bearing_text(&self) -> String {
        format!("{} {} {}", self.skills, self.experience, self.projects)
    }
}
