use crate::config::THRESHOLD;

/// Binary label for a screw image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Good,
    Bad,
}

impl Verdict {
    /// Threshold the model's anomaly probability. Ties go to `Bad`.
    pub fn from_probability(probability: f32) -> Self {
        if probability >= THRESHOLD {
            Verdict::Bad
        } else {
            Verdict::Good
        }
    }

    /// Name of the output subdirectory receiving files with this verdict
    pub fn dir_name(&self) -> &'static str {
        match self {
            Verdict::Good => "good",
            Verdict::Bad => "bad",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}
