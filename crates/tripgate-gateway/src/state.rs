use crate::domains::DomainTable;
use std::sync::Arc;
use tripgate_redirector::{Dispatcher, Redirector};

#[derive(Clone)]
pub struct AppState {
    redirector: Arc<dyn Redirector>,
    domains: Arc<DomainTable>,
    dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(
        redirector: Arc<dyn Redirector>,
        domains: DomainTable,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            redirector,
            domains: Arc::new(domains),
            dispatcher,
        }
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    pub fn domains(&self) -> &DomainTable {
        &self.domains
    }

    /// Events raised by the gateway itself, such as unknown hosts.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
