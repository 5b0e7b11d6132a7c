//! Span definitions per pipeline stage.

/// Classification of one query.
#[macro_export]
macro_rules! classify_span {
    ($request_id:expr) => {
        tracing::info_span!("concierge.classify", request_id = %$request_id)
    };
}

/// Role validation.
#[macro_export]
macro_rules! authorize_span {
    ($role:expr, $intent:expr) => {
        tracing::info_span!("concierge.authorize", role = %$role, intent = %$intent)
    };
}

/// Routing and answer production.
#[macro_export]
macro_rules! route_span {
    ($intent:expr, $data_source:expr) => {
        tracing::info_span!(
            "concierge.route",
            intent = %$intent,
            data_source = $data_source.as_str()
        )
    };
}

/// Document retrieval.
#[macro_export]
macro_rules! retrieval_span {
    ($intent:expr) => {
        tracing::info_span!("concierge.retrieval", intent = %$intent)
    };
}

/// Structured data lookup.
#[macro_export]
macro_rules! data_span {
    ($intent:expr) => {
        tracing::info_span!("concierge.data", intent = %$intent)
    };
}

/// A generation call. `$purpose` is e.g. "format" or "synthesis".
#[macro_export]
macro_rules! generation_span {
    ($purpose:expr) => {
        tracing::info_span!("concierge.generation", purpose = %$purpose)
    };
}
