pub mod ticket;

use serde::Deserialize;
use tracing::debug;
use zendesk_api::error::Result;
use zendesk_api::scope::RequestScope;
use zendesk_api::ApiClient;

pub use ticket::{CustomField, CustomFieldValue, SatisfactionRating, Ticket, Via};

/// Accessor for the ticket resource: list all tickets, or fetch one by id.
///
/// The accessor holds a client handle and the scope its requests run under.
/// Both are immutable; [`TicketApi::with_scope`] produces a rebound accessor
/// sharing the same transport while the original stays usable.
#[derive(Clone)]
pub struct TicketApi {
    client: ApiClient,
    scope: RequestScope,
}

#[derive(Deserialize)]
struct TicketsResponse {
    tickets: Vec<Ticket>,
}

#[derive(Deserialize)]
struct TicketResponse {
    ticket: Ticket,
}

impl TicketApi {
    /// Binds the accessor to `client` under an unbounded scope.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            scope: RequestScope::new(),
        }
    }

    /// Rebinds to `scope`, leaving this accessor untouched.
    pub fn with_scope(&self, scope: RequestScope) -> Self {
        Self {
            client: self.client.clone(),
            scope,
        }
    }

    /// Lists all tickets in server-returned order. An account with no
    /// tickets yields an empty Vec, not an error.
    pub async fn list(&self) -> Result<Vec<Ticket>> {
        self.get_tickets("/api/v2/tickets.json", None).await
    }

    /// Fetches the ticket with the given id. An unknown id is reported by
    /// the remote (404) and propagated; no local validation is performed.
    pub async fn show(&self, id: u64) -> Result<Ticket> {
        let path = format!("/api/v2/tickets/{}.json", id);
        self.get_ticket(&path, None).await
    }

    // Query parameters are reserved for filtering/pagination extensions;
    // list and show pass none.
    async fn get_tickets(&self, path: &str, query: Option<&[(&str, &str)]>) -> Result<Vec<Ticket>> {
        debug!(path, "Fetching ticket collection");
        let response: TicketsResponse = self.client.get(&self.scope, path, query).await?;
        Ok(response.tickets)
    }

    async fn get_ticket(&self, path: &str, query: Option<&[(&str, &str)]>) -> Result<Ticket> {
        debug!(path, "Fetching ticket");
        let response: TicketResponse = self.client.get(&self.scope, path, query).await?;
        Ok(response.ticket)
    }
}
