//! ViewState - Selection and Fetch Generations
//!
//! Every fetch is stamped with the generation current when it started. A
//! response is applied only while its token is still current, so a slow
//! answer for a previous selection can never overwrite a newer one.

/// Token handed to a fetch when it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchToken(u64);

/// Monotonic generation counter
#[derive(Debug, Default)]
pub struct FetchGeneration {
    current: u64,
}

impl FetchGeneration {
    /// Invalidate all outstanding tokens and issue a new one
    pub fn advance(&mut self) -> FetchToken {
        self.current += 1;
        FetchToken(self.current)
    }

    /// Token of the current generation, without invalidating anything
    pub fn token(&self) -> FetchToken {
        FetchToken(self.current)
    }

    pub fn is_current(&self, token: FetchToken) -> bool {
        token.0 == self.current
    }
}

/// The selected system and the generation tied to it
#[derive(Debug, Default)]
pub struct Selection {
    system_id: Option<String>,
    generation: FetchGeneration,
}

impl Selection {
    pub fn system_id(&self) -> Option<&str> {
        self.system_id.as_deref()
    }

    /// Change the selection; fetches for the previous one become stale
    pub fn select(&mut self, system_id: impl Into<String>) -> FetchToken {
        self.system_id = Some(system_id.into());
        self.generation.advance()
    }

    /// Drop the selection; every outstanding fetch becomes stale
    pub fn clear(&mut self) {
        self.system_id = None;
        self.generation.advance();
    }

    /// Token for a refresh of the current selection
    pub fn token(&self) -> Option<(FetchToken, &str)> {
        self.system_id
            .as_deref()
            .map(|id| (self.generation.token(), id))
    }

    /// Whether a response stamped with `token` may still be applied
    pub fn accepts(&self, token: FetchToken) -> bool {
        self.system_id.is_some() && self.generation.is_current(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reselect_invalidates_old_token() {
        let mut selection = Selection::default();
        let first = selection.select("PV-001");
        assert!(selection.accepts(first));

        let second = selection.select("PV-002");
        assert!(!selection.accepts(first));
        assert!(selection.accepts(second));
    }

    #[test]
    fn test_refresh_token_matches_selection() {
        let mut selection = Selection::default();
        assert!(selection.token().is_none());

        let selected = selection.select("PV-001");
        let (refresh, id) = selection.token().expect("selected");
        assert_eq!(refresh, selected);
        assert_eq!(id, "PV-001");

        selection.clear();
        assert!(!selection.accepts(refresh));
    }
}
