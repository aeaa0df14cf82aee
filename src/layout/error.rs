/// Failures raised by the layout engine. Layout of well-formed input never
/// fails; these cover bad ingestion and requests naming unknown elements.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("link {link} references node index {index}, but only {node_count} nodes exist")]
    LinkIndex {
        link: usize,
        index: usize,
        node_count: usize,
    },
    #[error("unknown node id {id}")]
    UnknownNode { id: usize },
    #[error("unknown link id {id}")]
    UnknownLink { id: usize },
    #[error("playback mode is not enabled")]
    PlaybackDisabled,
}
