//! HTTP/1 front door: `POST /rpc` for calls and `GET /subscribe` for live record sets.

use crate::{
    error,
    rpc::{self, Call},
    subscription::Publication,
    util, Classroom,
};
use core::convert::Infallible;
use futures_util::{future, StreamExt};
use http_body_util::{combinators::UnsyncBoxBody, BodyExt, Empty, Full, LengthLimitError, Limited, StreamBody};
use hyper::{
    body::{Bytes, Frame, Incoming},
    header::{HeaderValue, CONTENT_TYPE},
    Method, Request, Response, StatusCode,
};
use model::{Id, Principal};
use serde::Serialize;

pub type Body = UnsyncBoxBody<Bytes, Infallible>;

/// Largest accepted call body.
const MAX_CALL_BYTES: usize = 64 * 1024;

enum Route {
    Call,
    Subscribe,
}

#[derive(Serialize)]
struct Failure {
    error: &'static str,
    message: String,
}

fn status_of(err: &rpc::error::Error) -> StatusCode {
    use error::Error as E;
    use rpc::error::Error as R;
    match err {
        R::Denied(E::NotAuthorized) => StatusCode::FORBIDDEN,
        R::UnknownMethod | R::Denied(E::ResourceNotFound(_)) => StatusCode::NOT_FOUND,
        R::InvalidParams | R::Denied(E::InvalidQuestion(_)) => StatusCode::BAD_REQUEST,
        R::Denied(
            E::NotInGroup | E::AlreadyInGroup | E::QuestionInactive | E::AnswerOutOfRange | E::AnswerOutOfTime,
        ) => StatusCode::CONFLICT,
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: Body) -> Response<Body> {
    let mut res = Response::new(body);
    *res.status_mut() = status;
    assert!(res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type)).is_none());
    res
}

/// A bodiless response, for requests rejected before reaching any operation.
pub fn empty(status: StatusCode) -> Response<Body> {
    let mut res = Response::new(Empty::new().boxed_unsync());
    *res.status_mut() = status;
    res
}

fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>, StatusCode> {
    let bytes = serde_json::to_vec(value).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(respond(status, "application/json", Full::new(Bytes::from(bytes)).boxed_unsync()))
}

fn failure(err: rpc::error::Error) -> Result<Response<Body>, StatusCode> {
    json(status_of(&err), &Failure { error: err.code(), message: err.to_string() })
}

pub async fn try_respond(req: Request<Incoming>, classroom: &Classroom) -> Result<Response<Body>, StatusCode> {
    let (route, method) = match req.uri().path() {
        "/rpc" => (Route::Call, Method::POST),
        "/subscribe" => (Route::Subscribe, Method::GET),
        _ => return Err(StatusCode::NOT_FOUND),
    };
    if req.method() != method {
        return Err(StatusCode::METHOD_NOT_ALLOWED);
    }

    let principal: Principal = util::session::extract_session(req.headers())
        .and_then(|session| classroom.database().session(session))
        .into();
    match route {
        Route::Call => on_call(req, &principal, classroom).await,
        Route::Subscribe => on_subscribe(req.uri().query().unwrap_or_default(), &principal, classroom),
    }
}

async fn on_call(req: Request<Incoming>, principal: &Principal, classroom: &Classroom) -> Result<Response<Body>, StatusCode> {
    let bytes = Limited::new(req.into_body(), MAX_CALL_BYTES)
        .collect()
        .await
        .map_err(|err| {
            if err.downcast_ref::<LengthLimitError>().is_some() {
                StatusCode::PAYLOAD_TOO_LARGE
            } else {
                log::error!("Failed to read call body: {err}");
                StatusCode::BAD_REQUEST
            }
        })?
        .to_bytes();
    let call: Call = serde_json::from_slice(&bytes).map_err(|_| StatusCode::BAD_REQUEST)?;

    match classroom.call(principal, call) {
        Ok(()) => json(StatusCode::OK, &true),
        Err(err) => failure(err),
    }
}

fn on_subscribe(query: &str, principal: &Principal, classroom: &Classroom) -> Result<Response<Body>, StatusCode> {
    let (name, id) = util::query::parse_name_and_id(query).ok_or(StatusCode::BAD_REQUEST)?;
    let id = id.map(str::parse::<Id>).transpose().map_err(|_| StatusCode::BAD_REQUEST)?;
    let Some(publication) = Publication::parse(name, id) else {
        return failure(rpc::error::Error::UnknownMethod);
    };

    let snapshots = match classroom.subscribe(principal, publication) {
        Ok(snapshots) => snapshots,
        Err(err) => return failure(err.into()),
    };
    let frames = snapshots.filter_map(|snapshot| {
        let frame = match serde_json::to_vec(&snapshot) {
            Ok(mut line) => {
                line.push(b'\n');
                Some(Ok::<_, Infallible>(Frame::data(Bytes::from(line))))
            }
            Err(err) => {
                log::error!("Dropped an unserializable snapshot: {err}");
                None
            }
        };
        future::ready(frame)
    });
    Ok(respond(StatusCode::OK, "application/x-ndjson", StreamBody::new(frames).boxed_unsync()))
}
