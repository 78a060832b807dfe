//! Mounting the documentation on an HTTP route table and serving it.
//!
//! Three routes are registered:
//!
//! - `GET /api-doc` redirects to the bundled viewer page
//! - `GET /api-doc.json` returns the pretty-printed document
//! - `GET /APIDoc.html` returns the viewer page itself
//!
//! The document is serialized once at mount time, so later changes to the
//! in-memory document are not reflected in what is served.

use crate::document::ServiceDocument;
use crate::error::{Error, Result};
use crate::serializer::serialize;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io;
use tiny_http::{Header, Method, Request, Response, Server};

pub const DOC_REDIRECT_PATH: &str = "/api-doc";
pub const DOC_JSON_PATH: &str = "/api-doc.json";
pub const VIEWER_PATH: &str = "/APIDoc.html";

/// Bundled HTML viewer that renders `/api-doc.json`
pub const VIEWER_PAGE: &str = include_str!("../static/APIDoc.html");

/// What a mounted path answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Json(String),
    Redirect(String),
    Html(&'static str),
}

/// GET routes keyed by exact path.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a GET route, replacing any route already mounted at `path`.
    pub fn get(&mut self, path: impl Into<String>, route: Route) {
        let path = path.into();
        debug!("Mounting GET {}", path);
        self.routes.insert(path, route);
    }

    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Registers the documentation routes on `table`.
///
/// # Errors
///
/// Returns [`Error::NullHostError`] when no table is supplied, and any
/// validation error from serializing the document.
pub fn host_to_server(doc: &ServiceDocument, table: Option<&mut RouteTable>) -> Result<()> {
    let table = table.ok_or(Error::NullHostError)?;

    let json = serialize(doc, true)?;
    table.get(DOC_REDIRECT_PATH, Route::Redirect(VIEWER_PATH.to_string()));
    table.get(DOC_JSON_PATH, Route::Json(json));
    table.get(VIEWER_PATH, Route::Html(VIEWER_PAGE));

    info!("Documentation mounted at {} and {}", DOC_REDIRECT_PATH, DOC_JSON_PATH);
    Ok(())
}

/// A fully decided HTTP answer, independent of the server library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub location: Option<String>,
    pub body: String,
}

impl Reply {
    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            location: None,
            body: body.to_string(),
        }
    }
}

/// Decides the answer for a request. Query strings are ignored for matching.
pub fn dispatch(table: &RouteTable, is_get: bool, url: &str) -> Reply {
    let path = url.split('?').next().unwrap_or(url);

    let Some(route) = table.lookup(path) else {
        return Reply::text(404, "Not Found");
    };
    if !is_get {
        return Reply::text(405, "Method Not Allowed");
    }

    match route {
        Route::Json(body) => Reply {
            status: 200,
            content_type: "application/json",
            location: None,
            body: body.clone(),
        },
        Route::Redirect(target) => Reply {
            status: 302,
            content_type: "text/plain; charset=utf-8",
            location: Some(target.clone()),
            body: String::new(),
        },
        Route::Html(page) => Reply {
            status: 200,
            content_type: "text/html; charset=utf-8",
            location: None,
            body: page.to_string(),
        },
    }
}

/// Binds `addr` and answers requests from `table` until the process exits.
pub fn serve(table: &RouteTable, addr: &str) -> Result<()> {
    let server = Server::http(addr).map_err(|e| {
        Error::IoError(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("cannot bind {}: {}", addr, e),
        ))
    })?;

    info!("Serving documentation on http://{}{}", addr, DOC_REDIRECT_PATH);
    answer_requests(table, server.incoming_requests());
    Ok(())
}

/// Answers every request in turn. A request that cannot be answered, for
/// instance because its client hung up, is logged and skipped.
pub fn answer_requests(table: &RouteTable, requests: impl IntoIterator<Item = Request>) {
    for request in requests {
        if let Err(e) = handle(table, request) {
            warn!("Failed to answer request: {}", e);
        }
    }
}

/// Answers a single request.
pub fn handle(table: &RouteTable, request: Request) -> Result<()> {
    let reply = dispatch(table, *request.method() == Method::Get, request.url());
    debug!("{} {} -> {}", request.method(), request.url(), reply.status);

    let mut response = Response::from_string(reply.body).with_status_code(reply.status);
    add_header(&mut response, "Content-Type", reply.content_type);
    if let Some(location) = &reply.location {
        add_header(&mut response, "Location", location);
    }

    request.respond(response)?;
    Ok(())
}

fn add_header<R: io::Read>(response: &mut Response<R>, name: &str, value: &str) {
    match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
        Ok(header) => response.add_header(header),
        Err(()) => warn!("Dropping invalid header {}: {}", name, value),
    }
}
