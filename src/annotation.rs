use crate::span::TokenSpan;
use crate::token::TokenSequence;

/// Direction of an argumentative unit relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stance {
    Support,
    Attack,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Support => "support",
            Stance::Attack => "attack",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The annotation task a batch of worker submissions belongs to.
///
/// Major claim and claim batches are collected per document; premise batches
/// are collected per claim of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    MajorClaim,
    Claim,
    Premise,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::MajorClaim => "major_claim",
            TaskKind::Claim => "claim",
            TaskKind::Premise => "premise",
        }
    }
}

/// What a worker actually submitted: a token span, or free text when they
/// declared that the document has nothing to mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationBody {
    Span(TokenSpan),
    Comment(String),
}

impl AnnotationBody {
    pub fn span(&self) -> Option<TokenSpan> {
        match self {
            AnnotationBody::Span(span) => Some(*span),
            AnnotationBody::Comment(_) => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, AnnotationBody::Comment(_))
    }
}

/// One submission by one worker within a task batch.
///
/// Claim and premise tasks carry a stance; major claim tasks do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerAnnotation {
    pub worker: String,
    pub stance: Option<Stance>,
    pub body: AnnotationBody,
}

impl WorkerAnnotation {
    pub fn span(worker: impl Into<String>, stance: Option<Stance>, span: TokenSpan) -> Self {
        WorkerAnnotation {
            worker: worker.into(),
            stance,
            body: AnnotationBody::Span(span),
        }
    }

    pub fn comment(worker: impl Into<String>, stance: Option<Stance>, text: impl Into<String>) -> Self {
        WorkerAnnotation {
            worker: worker.into(),
            stance,
            body: AnnotationBody::Comment(text.into()),
        }
    }
}

/// All worker submissions of one task batch over one tokenized document.
///
/// Besides the annotations themselves, a batch knows which workers attempted
/// the task at all. A worker who accepted the assignment but produced neither
/// a span nor a comment still counts as attempting; agreement denominators
/// and rater dimensions are built from that list.
#[derive(Debug, Clone)]
pub struct AnnotatedDocument {
    document_id: String,
    kind: TaskKind,
    tokens: TokenSequence,
    annotations: Vec<WorkerAnnotation>,
    attempting: Vec<String>,
}

impl AnnotatedDocument {
    pub fn new(
        document_id: impl Into<String>,
        kind: TaskKind,
        tokens: TokenSequence,
        annotations: Vec<WorkerAnnotation>,
    ) -> Self {
        let mut attempting: Vec<String> = Vec::new();
        for annotation in &annotations {
            if !attempting.contains(&annotation.worker) {
                attempting.push(annotation.worker.clone());
            }
        }
        AnnotatedDocument {
            document_id: document_id.into(),
            kind,
            tokens,
            annotations,
            attempting,
        }
    }

    /// Replaces the attempting-worker list derived from the annotations with
    /// the full list of workers whose assignments were accepted, including
    /// those who submitted nothing usable.
    pub fn with_attempting(mut self, workers: Vec<String>) -> Self {
        self.attempting = workers;
        self
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn tokens(&self) -> &TokenSequence {
        &self.tokens
    }

    pub fn annotations(&self) -> &[WorkerAnnotation] {
        &self.annotations
    }

    /// Workers that attempted this batch, in first-seen order.
    pub fn attempting_workers(&self) -> &[String] {
        &self.attempting
    }

    /// Workers with at least one submission in this batch, in first-seen
    /// order.
    pub fn distinct_workers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for annotation in &self.annotations {
            let worker = annotation.worker.as_str();
            if !seen.contains(&worker) {
                seen.push(worker);
            }
        }
        seen
    }

    /// Workers whose submissions include at least one in-text span, in
    /// first-seen order. Comment-only workers are excluded.
    pub fn contributing_workers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for (annotation, _) in self.span_annotations() {
            let worker = annotation.worker.as_str();
            if !seen.contains(&worker) {
                seen.push(worker);
            }
        }
        seen
    }

    /// Annotations that resolved to an in-text span.
    pub fn span_annotations(&self) -> impl Iterator<Item = (&WorkerAnnotation, TokenSpan)> {
        self.annotations
            .iter()
            .filter_map(|a| a.body.span().map(|span| (a, span)))
    }

    /// Annotations where the worker submitted a comment instead of a span.
    pub fn comment_annotations(&self) -> impl Iterator<Item = &WorkerAnnotation> {
        self.annotations.iter().filter(|a| a.body.is_comment())
    }
}
