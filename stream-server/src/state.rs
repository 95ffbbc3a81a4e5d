use stream_matcher::StreamSelector;

#[derive(Clone)]
pub struct AppState {
    pub selector: StreamSelector,
}
