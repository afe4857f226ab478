use salvo::http::HeaderValue;
use salvo::http::header::X_FRAME_OPTIONS;

use bastion_core::constants::FRAME_OPTIONS_POLICY;

/// Adds `X-Frame-Options: SAMEORIGIN` to every response, denials included.
pub struct FrameOptionsHandler;

#[salvo::async_trait]
impl salvo::Handler for FrameOptionsHandler {
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        _depot: &mut salvo::Depot,
        res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        res.headers_mut()
            .insert(X_FRAME_OPTIONS, HeaderValue::from_static(FRAME_OPTIONS_POLICY));
    }
}
