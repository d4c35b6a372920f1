use lambda_http::{Body, Request, Response};

use domain::UserId;
use shared::{bearer_token, TokenCodec};

use crate::error::ApiError;
use crate::handlers;
use crate::store::TodoStore;

pub async fn route(
    req: Request,
    db: &dyn TodoStore,
    codec: &TokenCodec,
) -> Result<Response<Body>, lambda_http::Error> {
    let path = req.uri().path().to_string();
    let method = req.method().as_str().to_string();

    tracing::info!(path = %path, method = %method, "Incoming request");

    let result = match route_inner(req, db, codec, &path, &method).await {
        Ok(mut resp) => {
            add_cors_headers(&mut resp);
            resp
        }
        Err(e) => {
            tracing::error!(error = %e, path = %path, "Request failed");
            let mut resp = e.into_response();
            add_cors_headers(&mut resp);
            resp
        }
    };

    Ok(result)
}

async fn route_inner(
    req: Request,
    db: &dyn TodoStore,
    codec: &TokenCodec,
    path: &str,
    method: &str,
) -> Result<Response<Body>, ApiError> {
    if method == "OPTIONS" {
        return Ok(Response::builder().status(204).body(Body::Empty).unwrap());
    }

    // Token check happens before any handler runs; there is no
    // anonymous path into the store.
    let subject = authenticate(&req, codec)?;

    match (method, path) {
        ("GET", "/get_list") => handlers::get_list(req, db, &subject).await,
        ("POST", "/add_list") => handlers::add_list(req, db, &subject).await,
        ("POST", "/update_list") => handlers::update_list(req, db, &subject).await,
        ("POST", "/del_list") => handlers::delete_list(req, db, &subject).await,
        _ => Err(ApiError::NotFound),
    }
}

fn authenticate(req: &Request, codec: &TokenCodec) -> Result<UserId, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());
    let token = bearer_token(header)?;
    let claims = codec.decode(token)?;
    Ok(claims.subject())
}

fn add_cors_headers(resp: &mut Response<Body>) {
    let headers = resp.headers_mut();
    headers.insert("Access-Control-Allow-Origin", "*".parse().unwrap());
    headers.insert(
        "Access-Control-Allow-Methods",
        "GET,POST,OPTIONS".parse().unwrap(),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        "Content-Type,Authorization".parse().unwrap(),
    );
}
