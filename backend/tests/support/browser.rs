//! Cookie-carrying client for driving the page routes in-process.
//!
//! Wires the real handlers over a [`MemoryStore`] and a frozen clock, and
//! replays the session cookie between requests like a browser would.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use chrono::NaiveDate;
use serde_json::Value;

use ehotels::Trace;
use ehotels::inbound::http::state::{HttpState, HttpStatePorts};
use ehotels::inbound::http::{configure, redirect_server_errors};
use ehotels::test_support::{FixedClock, MemoryStore};

const SESSION_COOKIE: &str = "session";

/// Test client holding the app and the latest session cookie.
pub struct Browser<S> {
    app: S,
    cookie: Option<Cookie<'static>>,
}

/// Start a client over `store`, with "today" frozen at `today`.
pub async fn open(
    store: Arc<MemoryStore>,
    today: NaiveDate,
) -> Browser<
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
> {
    let state = web::Data::new(HttpState::new(
        HttpStatePorts::from_store(store),
        Arc::new(FixedClock::on(today)),
    ));
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build();
    let app = actix_test::init_service(
        App::new().app_data(state).wrap(Trace).service(
            web::scope("")
                .wrap(redirect_server_errors())
                .wrap(session)
                .configure(configure),
        ),
    )
    .await;
    Browser { app, cookie: None }
}

impl<S, B> Browser<S>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    /// Issue a GET and remember any new session cookie.
    pub async fn get(&mut self, uri: &str) -> ServiceResponse<B> {
        let req = self.with_cookie(actix_test::TestRequest::get().uri(uri));
        self.send(req).await
    }

    /// Submit a urlencoded form.
    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> ServiceResponse<B> {
        let req = self.with_cookie(actix_test::TestRequest::post().uri(uri).set_form(form));
        self.send(req).await
    }

    /// POST, expect a `303`, and return where it points.
    pub async fn submit(&mut self, uri: &str, form: &[(&str, &str)]) -> String {
        let res = self.post(uri, form).await;
        location(&res)
    }

    /// GET a page and decode its JSON body.
    pub async fn page(&mut self, uri: &str) -> Value {
        let res = self.get(uri).await;
        assert_eq!(res.status(), StatusCode::OK, "GET {uri} should render");
        actix_test::read_body_json(res).await
    }

    /// Log in and return the landing location.
    pub async fn login(&mut self, form: &[(&str, &str)]) -> String {
        self.submit("/auth/login", form).await
    }

    fn with_cookie(&self, req: actix_test::TestRequest) -> Request {
        match &self.cookie {
            Some(cookie) => req.cookie(cookie.clone()).to_request(),
            None => req.to_request(),
        }
    }

    async fn send(&mut self, req: Request) -> ServiceResponse<B> {
        let res = actix_test::call_service(&self.app, req).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
        {
            self.cookie = (!cookie.value().is_empty()).then(|| cookie.into_owned());
        }
        res
    }
}

/// The `Location` of a `303 See Other`.
pub fn location<B>(res: &ServiceResponse<B>) -> String {
    assert_eq!(res.status(), StatusCode::SEE_OTHER, "expected a redirect");
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
        .to_owned()
}

/// Messages of the flashes rendered on `page`.
pub fn flash_messages(page: &Value) -> Vec<String> {
    page["flashes"]
        .as_array()
        .map(|flashes| {
            flashes
                .iter()
                .filter_map(|flash| flash["message"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
