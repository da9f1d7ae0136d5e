//! Tower middleware layer for the request gate.
//!
//! The [`GateLayer`] validates the presented token before the inner service
//! runs. On success the [`AuthContext`] is inserted into request extensions;
//! on failure the request is answered with 401 and the inner service is
//! never called.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use authgate_core::TokenService;
use authgate_store::IdentityStore;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use pin_project_lite::pin_project;
use tower::{Layer, Service};

use crate::context::{AuthContext, AuthSource};
use crate::error::GateError;
use crate::extractors::AuthContextExt;

const BEARER_PREFIX: &str = "bearer ";

/// Tower layer that authenticates requests against a [`TokenService`].
pub struct GateLayer<St: IdentityStore> {
    tokens: Arc<TokenService<St>>,
}

impl<St: IdentityStore> GateLayer<St> {
    /// Create a new gate layer.
    #[must_use]
    pub fn new(tokens: Arc<TokenService<St>>) -> Self {
        Self { tokens }
    }
}

impl<St: IdentityStore> Clone for GateLayer<St> {
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<S, St: IdentityStore> Layer<S> for GateLayer<St> {
    type Service = GateService<S, St>;

    fn layer(&self, inner: S) -> Self::Service {
        GateService {
            inner,
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// The request gate service.
pub struct GateService<S, St: IdentityStore> {
    inner: S,
    tokens: Arc<TokenService<St>>,
}

impl<S: Clone, St: IdentityStore> Clone for GateService<S, St> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Pull the token out of the `Authorization` header.
///
/// `Bearer <token>` is accepted with any casing of the scheme; otherwise the
/// whole trimmed header value is taken as the token. The token itself is
/// returned unchanged.
pub fn extract_token(headers: &HeaderMap) -> Result<(String, AuthSource), GateError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(GateError::MissingCredentials)?
        .to_str()
        .map_err(|_| GateError::InvalidHeader)?
        .trim();

    if value.is_empty() || value.eq_ignore_ascii_case(BEARER_PREFIX.trim_end()) {
        return Err(GateError::MissingCredentials);
    }

    match value.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            let token = value[BEARER_PREFIX.len()..].trim();
            if token.is_empty() {
                return Err(GateError::MissingCredentials);
            }
            Ok((token.to_string(), AuthSource::BearerToken))
        }
        _ => Ok((value.to_string(), AuthSource::RawHeader)),
    }
}

impl<S, St> Service<Request<Body>> for GateService<S, St>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    St: IdentityStore + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = GateFuture<S>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // The ready service is the one polled above; leave a fresh clone behind.
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);

        let extracted = extract_token(req.headers());
        let tokens = Arc::clone(&self.tokens);
        let validation: BoxFuture<'static, Result<AuthContext, GateError>> =
            Box::pin(async move {
                let (token, source) = extracted?;
                let claims = tokens.validate(&token).await?;
                Ok::<_, GateError>(AuthContext::new(claims, token, source))
            });

        GateFuture {
            state: GateState::Authenticating {
                validation,
                inner: Some(inner),
                req: Some(req),
            },
        }
    }
}

pin_project! {
    /// Future for the gate service.
    pub struct GateFuture<S>
    where
        S: Service<Request<Body>>,
    {
        #[pin]
        state: GateState<S>,
    }
}

pin_project! {
    #[project = GateStateProj]
    enum GateState<S>
    where
        S: Service<Request<Body>>,
    {
        Authenticating {
            validation: BoxFuture<'static, Result<AuthContext, GateError>>,
            inner: Option<S>,
            req: Option<Request<Body>>,
        },
        Calling {
            #[pin]
            future: S::Future,
        },
        Done,
    }
}

impl<S> Future for GateFuture<S>
where
    S: Service<Request<Body>, Response = Response>,
{
    type Output = Result<Response, S::Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        loop {
            let this = self.as_mut().project();

            match this.state.project() {
                GateStateProj::Authenticating {
                    validation,
                    inner,
                    req,
                } => {
                    let outcome = ready!(validation.as_mut().poll(cx));
                    let (Some(mut service), Some(mut request)) = (inner.take(), req.take()) else {
                        panic!("polled after completion");
                    };

                    match outcome {
                        Ok(context) => {
                            tracing::debug!(
                                identity = %context.identity(),
                                tenant_id = context.tenant_id(),
                                path = %request.uri().path(),
                                "Request authenticated"
                            );
                            request.extensions_mut().insert(AuthContextExt(context));
                            let future = service.call(request);
                            self.set(GateFuture {
                                state: GateState::Calling { future },
                            });
                        }
                        Err(err) => {
                            tracing::info!(
                                path = %request.uri().path(),
                                reason = err.error_code(),
                                "Request rejected at gate"
                            );
                            self.set(GateFuture {
                                state: GateState::Done,
                            });
                            return Poll::Ready(Ok(err.into_response()));
                        }
                    }
                }
                GateStateProj::Calling { future } => {
                    return future.poll(cx);
                }
                GateStateProj::Done => {
                    panic!("polled after completion");
                }
            }
        }
    }
}
