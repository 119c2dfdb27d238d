use crate::domain::FileDescriptor;

/// One benefit line of an analyzed policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageLine {
    pub treatment: String,
    pub sessions_per_year: u16,
    pub refund_percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyAnalysis {
    pub policy_name: String,
    pub coverage: Vec<CoverageLine>,
    pub notes: Vec<String>,
}

impl PolicyAnalysis {
    pub fn summary(&self) -> String {
        let mut out = format!("ניתוח פוליסה: {}", self.policy_name);
        for line in &self.coverage {
            out.push_str(&format!(
                "\n- {}: עד {} טיפולים בשנה, החזר {}%",
                line.treatment, line.sessions_per_year, line.refund_percent
            ));
        }
        for note in &self.notes {
            out.push_str(&format!("\n* {}", note));
        }
        out
    }
}

/// Stands in for `POST /policy/analyze`.
pub trait PolicyAnalyzer {
    fn analyze(&self, policy: &FileDescriptor) -> PolicyAnalysis;
}

/// Returns the same coverage table for every document.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPolicyAnalyzer;

impl PolicyAnalyzer for StaticPolicyAnalyzer {
    fn analyze(&self, policy: &FileDescriptor) -> PolicyAnalysis {
        let line = |treatment: &str, sessions_per_year, refund_percent| CoverageLine {
            treatment: treatment.to_string(),
            sessions_per_year,
            refund_percent,
        };
        PolicyAnalysis {
            policy_name: policy.name.clone(),
            coverage: vec![
                line("קלינאות תקשורת", 24, 75),
                line("ריפוי בעיסוק", 24, 75),
                line("פיזיותרפיה", 12, 60),
                line("טיפול רגשי", 20, 50),
            ],
            notes: vec![
                "נדרשת הפניה מרופא ילדים".to_string(),
                "השתתפות עצמית לפי מסלול הביטוח".to_string(),
            ],
        }
    }
}
