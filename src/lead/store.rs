use std::collections::VecDeque;

use super::Lead;

/// Captured leads of one session, in capture order. No uniqueness is enforced:
/// the same number sent twice is two leads.
#[derive(Debug, Default)]
pub struct LeadStore {
    leads: VecDeque<Lead>,
    max_leads: Option<usize>,
}

impl LeadStore {
    /// `max_leads` of `None` keeps every lead; otherwise the oldest are evicted.
    pub fn new(max_leads: Option<usize>) -> Self {
        Self { leads: VecDeque::new(), max_leads }
    }

    pub fn append(&mut self, lead: Lead) {
        self.leads.push_back(lead);
        if let Some(max) = self.max_leads {
            while self.leads.len() > max {
                self.leads.pop_front();
            }
        }
    }

    pub fn all(&self) -> Vec<Lead> {
        self.leads.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lead> {
        self.leads.iter()
    }

    pub fn latest(&self) -> Option<&Lead> {
        self.leads.back()
    }

    pub fn clear(&mut self) {
        self.leads.clear();
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}
