use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use headers::{Header, HeaderMapExt, HeaderName, HeaderValue};
use std::convert::Infallible;

static HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");

/// The `HX-Request` header htmx attaches to its own requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl Header for HxRequest {
    fn name() -> &'static HeaderName {
        &HX_REQUEST
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(headers::Error::invalid)?;
        Ok(Self(value.as_bytes().eq_ignore_ascii_case(b"true")))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        let value = if self.0 { "true" } else { "false" };
        values.extend(std::iter::once(HeaderValue::from_static(value)));
    }
}

/// Whether the caller wants a fragment instead of a full page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Htmx(pub bool);

impl Htmx {
    pub fn wants_fragment(self) -> bool {
        self.0
    }
}

impl<S> FromRequestParts<S> for Htmx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let fragment = parts
            .headers
            .typed_get::<HxRequest>()
            .is_some_and(|HxRequest(on)| on);
        Ok(Self(fragment))
    }
}
