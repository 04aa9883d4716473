//! Test fixtures for integration tests.

use ragsift::Candidate;

pub const DEFAULT_SOURCE: &str = "streamworks-handbuch.pdf";

pub const DEFAULT_SIMILARITY: f32 = 0.5;

#[derive(Default)]
pub struct CandidateBuilder {
    content: Option<String>,
    source: Option<String>,
    similarity: Option<f32>,
    method: Option<String>,
    page: Option<u32>,
}

impl CandidateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn similarity(mut self, score: f32) -> Self {
        self.similarity = Some(score);
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn build(self) -> Candidate {
        let similarity = self.similarity.unwrap_or(DEFAULT_SIMILARITY);
        let content = self
            .content
            .unwrap_or_else(|| format!("Abschnitt mit Ähnlichkeit {similarity}"));
        let mut candidate = Candidate::new(
            content,
            self.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            similarity,
        );
        if let Some(method) = self.method {
            candidate = candidate.with_method(method);
        }
        if let Some(page) = self.page {
            candidate = candidate.with_metadata("page", page.to_string());
        }
        candidate
    }
}

/// One candidate per score, all from [`DEFAULT_SOURCE`], with distinct contents.
pub fn candidates_with_scores(scores: &[f32]) -> Vec<Candidate> {
    scores
        .iter()
        .enumerate()
        .map(|(i, score)| {
            CandidateBuilder::new()
                .content(format!("Abschnitt {i} des Handbuchs"))
                .similarity(*score)
                .page(i as u32 + 1)
                .build()
        })
        .collect()
}

/// Small German corpus about exporting reports, with one clearly relevant chunk.
pub fn export_corpus() -> Vec<Candidate> {
    vec![
        CandidateBuilder::new()
            .content("Die Kantine im Erdgeschoss öffnet um 11 Uhr.")
            .source("hausordnung.pdf")
            .similarity(0.58)
            .build(),
        CandidateBuilder::new()
            .content("So exportiere ich Berichte aus StreamWorks: Menü Export wählen und Format festlegen.")
            .similarity(0.55)
            .page(12)
            .build(),
        CandidateBuilder::new()
            .content("Lizenzbedingungen und Support-Verträge.")
            .source("vertrag.pdf")
            .similarity(0.5)
            .build(),
    ]
}
