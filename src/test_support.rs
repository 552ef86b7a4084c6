//! Shared test doubles: scripted transport, recording navigator, fixtures.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::ClientConfig;
use crate::net::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::net::types::User;
use crate::session::SessionController;
use crate::session::interceptor::{NavigationError, Navigator};
use crate::storage::MemoryStorage;

pub fn user(id: &str) -> User {
    User {
        id: id.to_owned(),
        name: "A".to_owned(),
        username: "a".to_owned(),
        email: "a@x.com".to_owned(),
        avatar: None,
        verified: false,
        bio: None,
        location: None,
        website: None,
        joined_date: None,
    }
}

pub fn json_response(status: u16, body: &serde_json::Value) -> HttpResponse {
    HttpResponse { status, body: body.to_string() }
}

/// Transport that replays queued responses in order, then a fallback.
#[derive(Default)]
pub struct ScriptedTransport {
    queued: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    fallback: RefCell<Option<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
    yield_first: Cell<bool>,
}

impl ScriptedTransport {
    pub fn push(&self, response: HttpResponse) {
        self.queued.borrow_mut().push_back(Ok(response));
    }

    pub fn push_json(&self, status: u16, body: &serde_json::Value) {
        self.push(json_response(status, body));
    }

    pub fn push_error(&self, error: TransportError) {
        self.queued.borrow_mut().push_back(Err(error));
    }

    /// Answer with `response` whenever the queue is empty.
    pub fn always(&self, response: HttpResponse) {
        *self.fallback.borrow_mut() = Some(response);
    }

    /// Suspend once inside every `send` so concurrent callers interleave.
    pub fn yield_before_responding(&self) {
        self.yield_first.set(true);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        if self.yield_first.get() {
            tokio::task::yield_now().await;
        }
        let next = self.queued.borrow_mut().pop_front();
        match next {
            Some(result) => result,
            None => self
                .fallback
                .borrow()
                .clone()
                .ok_or_else(|| TransportError::Network("no scripted response".to_owned())),
        }
    }
}

/// Navigator that records every path it was asked to visit.
#[derive(Default)]
pub struct RecordingNavigator {
    visits: RefCell<Vec<String>>,
    fail: Cell<bool>,
    panic: Cell<bool>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    pub fn fail_next(&self) {
        self.fail.set(true);
    }

    pub fn panic_next(&self) {
        self.panic.set(true);
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        self.visits.borrow_mut().push(path.to_owned());
        if self.panic.replace(false) {
            panic!("navigation blew up");
        }
        if self.fail.replace(false) {
            return Err(NavigationError::Failed { path: path.to_owned(), reason: "blocked".to_owned() });
        }
        Ok(())
    }
}

pub struct Fixture {
    pub controller: SessionController<ScriptedTransport>,
    pub durable: Rc<MemoryStorage>,
    pub ephemeral: Rc<MemoryStorage>,
    pub navigator: Rc<RecordingNavigator>,
}

impl Fixture {
    pub fn transport(&self) -> &ScriptedTransport {
        self.controller.api().transport()
    }
}

pub fn fixture() -> Fixture {
    let durable = Rc::new(MemoryStorage::new());
    let ephemeral = Rc::new(MemoryStorage::new());
    let navigator = Rc::new(RecordingNavigator::default());
    let controller = SessionController::new(
        ClientConfig::default(),
        ScriptedTransport::default(),
        durable.clone(),
        ephemeral.clone(),
        navigator.clone(),
    );
    Fixture { controller, durable, ephemeral, navigator }
}
