use crate::classify::routing::Verdict;

/// Outcome for one input file
#[derive(Debug, Clone)]
pub struct Classification {
    pub file_name: String,
    pub probability: f32,
    pub verdict: Verdict,
}

/// Everything a classifier run produced, in processing order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub classifications: Vec<Classification>,
}

impl RunSummary {
    pub fn push(&mut self, classification: Classification) {
        self.classifications.push(classification);
    }

    pub fn total(&self) -> usize {
        self.classifications.len()
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.classifications
            .iter()
            .filter(|c| c.verdict == verdict)
            .count()
    }

    pub fn good(&self) -> usize {
        self.count(Verdict::Good)
    }

    pub fn bad(&self) -> usize {
        self.count(Verdict::Bad)
    }

    /// Look up the verdict recorded for a file name
    pub fn verdict_of(&self, file_name: &str) -> Option<Verdict> {
        self.classifications
            .iter()
            .find(|c| c.file_name == file_name)
            .map(|c| c.verdict)
    }
}
