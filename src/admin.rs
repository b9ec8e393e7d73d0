use serde::Serialize;

use crate::lead::{ ContactLinkBuilder, Lead, LeadStore };

pub const LOCKED_NOTICE: &str = "Enter the admin code to view the leads table.";
pub const DENIED_NOTICE: &str = "Incorrect Code";
pub const EMPTY_NOTICE: &str = "No leads captured yet.";

/// Shared-secret check guarding the leads dashboard. Plain equality: no
/// trimming, no case folding, no lockout.
#[derive(Clone)]
pub struct AdminGate {
    secret: String,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// An empty secret never authorizes anything.
    pub fn authorize(&self, code: &str) -> bool {
        !self.secret.is_empty() && code == self.secret
    }

    pub fn access(&self, code: &str) -> AdminAccess {
        if code.is_empty() {
            AdminAccess::Locked
        } else if self.authorize(code) {
            AdminAccess::Authorized
        } else {
            AdminAccess::Denied
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").field("secret", &"<redacted>").finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAccess {
    Locked,
    Denied,
    Authorized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadRow {
    pub time: String,
    pub phone: String,
    pub excerpt: String,
}

impl From<&Lead> for LeadRow {
    fn from(lead: &Lead) -> Self {
        Self {
            time: lead.display_time(),
            phone: lead.normalized_phone.clone(),
            excerpt: lead.source_excerpt.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactAction {
    pub label: String,
    pub url: String,
}

/// What the dashboard shows for the current code input. Rebuilt on every
/// request from the input alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AdminView {
    Locked {
        notice: String,
    },
    Denied {
        notice: String,
    },
    Authorized {
        leads: Vec<LeadRow>,
        contact: Option<ContactAction>,
        notice: Option<String>,
    },
}

impl AdminView {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AdminView::Authorized { .. })
    }
}

pub fn render_dashboard(
    gate: &AdminGate,
    code: &str,
    leads: &LeadStore,
    links: &ContactLinkBuilder,
    contact_message: &str
) -> AdminView {
    match gate.access(code) {
        AdminAccess::Locked => AdminView::Locked { notice: LOCKED_NOTICE.to_string() },
        AdminAccess::Denied => AdminView::Denied { notice: DENIED_NOTICE.to_string() },
        AdminAccess::Authorized => {
            let rows = leads.iter().map(LeadRow::from).collect();
            let contact = leads.latest().map(|lead| ContactAction {
                label: format!("Chat with Client: {}", lead.normalized_phone),
                url: links.build(&lead.normalized_phone, contact_message),
            });
            let notice = if contact.is_none() { Some(EMPTY_NOTICE.to_string()) } else { None };
            AdminView::Authorized { leads: rows, contact, notice }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &str = "Hi! This is BinMajid Tourism.";

    fn gate() -> AdminGate {
        AdminGate::new("binmajid2024")
    }

    #[test]
    fn authorize_is_exact_match() {
        let g = gate();
        assert!(g.authorize("binmajid2024"));
        assert!(!g.authorize("BINMAJID2024"));
        assert!(!g.authorize(" binmajid2024"));
        assert!(!g.authorize("binmajid2024 "));
        assert!(!g.authorize(""));
    }

    #[test]
    fn empty_secret_never_authorizes() {
        let g = AdminGate::new("");
        assert!(!g.authorize(""));
        assert_eq!(g.access(""), AdminAccess::Locked);
        assert_eq!(g.access("anything"), AdminAccess::Denied);
    }

    #[test]
    fn three_states_follow_the_input() {
        let g = gate();
        assert_eq!(g.access(""), AdminAccess::Locked);
        assert_eq!(g.access("nope"), AdminAccess::Denied);
        assert_eq!(g.access("binmajid2024"), AdminAccess::Authorized);
        assert_eq!(g.access(""), AdminAccess::Locked);
    }

    #[test]
    fn debug_output_hides_secret() {
        assert!(!format!("{:?}", gate()).contains("binmajid2024"));
    }

    #[test]
    fn authorized_view_without_leads_has_notice() {
        let store = LeadStore::new(None);
        let view = render_dashboard(&gate(), "binmajid2024", &store, &ContactLinkBuilder::default(), MESSAGE);
        assert_eq!(view, AdminView::Authorized {
            leads: vec![],
            contact: None,
            notice: Some(EMPTY_NOTICE.to_string()),
        });
    }

    #[test]
    fn contact_action_targets_latest_lead() {
        let mut store = LeadStore::new(None);
        store.append(Lead::capture("first 91234567", 30).unwrap());
        store.append(Lead::capture("second +96899887766", 30).unwrap());

        let view = render_dashboard(&gate(), "binmajid2024", &store, &ContactLinkBuilder::default(), MESSAGE);
        match view {
            AdminView::Authorized { leads, contact: Some(contact), notice: None } => {
                assert_eq!(leads.len(), 2);
                assert_eq!(leads[1].phone, "96899887766");
                assert_eq!(contact.label, "Chat with Client: 96899887766");
                assert!(contact.url.starts_with("https://wa.me/96899887766?text="));
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn denied_view_does_not_leak_leads() {
        let mut store = LeadStore::new(None);
        store.append(Lead::capture("91234567", 30).unwrap());
        let view = render_dashboard(&gate(), "guess", &store, &ContactLinkBuilder::default(), MESSAGE);
        assert_eq!(view, AdminView::Denied { notice: DENIED_NOTICE.to_string() });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "denied");
    }
}
