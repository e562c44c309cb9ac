//! Widget state machines for the spell-line row.
//!
//! Each spell line owns a small state value reduced by a single message
//! dispatcher, instead of closures mutating the DOM ad hoc. The detail
//! panel's `Loading` state carries the request id that started the
//! fetch; a response whose id no longer matches is stale (the user
//! closed or re-opened the panel meanwhile) and is discarded. That
//! discard is the only cancellation safeguard in the client.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComboState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Closed,
    Loading {
        request_id: Uuid,
    },
    Shown {
        html: String,
    },
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DicePanelState {
    #[default]
    Closed,
    Open,
}

/// Presentation state of one spell line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpellLineState {
    /// Canonical slug once picked; the raw imported value before that.
    pub slug: String,
    /// What the visible combo input shows.
    pub display: String,
    pub combo: ComboState,
    pub detail: DetailState,
    pub dice: DicePanelState,
}

impl SpellLineState {
    pub fn new(slug: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            display: display.into(),
            ..Self::default()
        }
    }
}

/// Everything that can happen to a spell line.
#[derive(Debug, Clone, PartialEq)]
pub enum SpellLineMsg {
    ComboOpened,
    ComboClosed,
    /// A catalog entry was picked from the list.
    SpellPicked { slug: String, name: String },
    /// The "use" button: show or hide the per-spell dice panel.
    DiceToggled,
    /// The detail panel was opened; a fetch with this id is in flight.
    DetailOpened { request_id: Uuid },
    DetailClosed,
    DetailLoaded { request_id: Uuid, html: String },
    DetailFailed { request_id: Uuid },
    /// The clear button: empty the line.
    Cleared,
}

/// Apply one message to the state.
pub fn reduce(state: &mut SpellLineState, msg: SpellLineMsg) {
    match msg {
        SpellLineMsg::ComboOpened => state.combo = ComboState::Open,
        SpellLineMsg::ComboClosed => state.combo = ComboState::Closed,
        SpellLineMsg::SpellPicked { slug, name } => {
            state.slug = slug;
            state.display = name;
            state.combo = ComboState::Closed;
            // picking a different spell invalidates the open detail
            state.detail = DetailState::Closed;
        }
        SpellLineMsg::DiceToggled => {
            state.dice = match state.dice {
                DicePanelState::Closed => DicePanelState::Open,
                DicePanelState::Open => DicePanelState::Closed,
            };
        }
        SpellLineMsg::DetailOpened { request_id } => {
            state.detail = DetailState::Loading { request_id };
        }
        SpellLineMsg::DetailClosed => state.detail = DetailState::Closed,
        SpellLineMsg::DetailLoaded { request_id, html } => {
            if state.detail == (DetailState::Loading { request_id }) {
                state.detail = DetailState::Shown { html };
            }
        }
        SpellLineMsg::DetailFailed { request_id } => {
            if state.detail == (DetailState::Loading { request_id }) {
                state.detail = DetailState::Failed;
            }
        }
        SpellLineMsg::Cleared => {
            state.slug.clear();
            state.display.clear();
            state.dice = DicePanelState::Closed;
            state.detail = DetailState::Closed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_load_happy_path() {
        let mut state = SpellLineState::new("fire-bolt", "Fire Bolt");
        let id = Uuid::new_v4();
        reduce(&mut state, SpellLineMsg::DetailOpened { request_id: id });
        reduce(
            &mut state,
            SpellLineMsg::DetailLoaded {
                request_id: id,
                html: "<p>1d10</p>".to_string(),
            },
        );
        assert_eq!(
            state.detail,
            DetailState::Shown {
                html: "<p>1d10</p>".to_string()
            }
        );
    }

    #[test]
    fn test_stale_response_after_close_is_discarded() {
        let mut state = SpellLineState::default();
        let id = Uuid::new_v4();
        reduce(&mut state, SpellLineMsg::DetailOpened { request_id: id });
        reduce(&mut state, SpellLineMsg::DetailClosed);
        reduce(
            &mut state,
            SpellLineMsg::DetailLoaded {
                request_id: id,
                html: "late".to_string(),
            },
        );
        assert_eq!(state.detail, DetailState::Closed);
    }

    #[test]
    fn test_stale_response_after_reopen_is_discarded() {
        let mut state = SpellLineState::default();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        reduce(&mut state, SpellLineMsg::DetailOpened { request_id: first });
        reduce(&mut state, SpellLineMsg::DetailOpened { request_id: second });
        reduce(
            &mut state,
            SpellLineMsg::DetailLoaded {
                request_id: first,
                html: "stale".to_string(),
            },
        );
        assert_eq!(state.detail, DetailState::Loading { request_id: second });

        reduce(
            &mut state,
            SpellLineMsg::DetailLoaded {
                request_id: second,
                html: "fresh".to_string(),
            },
        );
        assert_eq!(
            state.detail,
            DetailState::Shown {
                html: "fresh".to_string()
            }
        );
    }

    #[test]
    fn test_failed_only_applies_to_matching_request() {
        let mut state = SpellLineState::default();
        let id = Uuid::new_v4();
        reduce(&mut state, SpellLineMsg::DetailOpened { request_id: id });
        reduce(
            &mut state,
            SpellLineMsg::DetailFailed {
                request_id: Uuid::new_v4(),
            },
        );
        assert_eq!(state.detail, DetailState::Loading { request_id: id });
        reduce(&mut state, SpellLineMsg::DetailFailed { request_id: id });
        assert_eq!(state.detail, DetailState::Failed);
    }

    #[test]
    fn test_pick_closes_combo_and_detail() {
        let mut state = SpellLineState::default();
        reduce(&mut state, SpellLineMsg::ComboOpened);
        reduce(
            &mut state,
            SpellLineMsg::DetailOpened {
                request_id: Uuid::new_v4(),
            },
        );
        reduce(
            &mut state,
            SpellLineMsg::SpellPicked {
                slug: "shield".to_string(),
                name: "Shield".to_string(),
            },
        );
        assert_eq!(state.combo, ComboState::Closed);
        assert_eq!(state.detail, DetailState::Closed);
        assert_eq!(state.slug, "shield");
        assert_eq!(state.display, "Shield");
    }

    #[test]
    fn test_dice_toggle_and_clear() {
        let mut state = SpellLineState::new("shield", "Shield");
        reduce(&mut state, SpellLineMsg::DiceToggled);
        assert_eq!(state.dice, DicePanelState::Open);
        reduce(&mut state, SpellLineMsg::Cleared);
        assert!(state.slug.is_empty());
        assert!(state.display.is_empty());
        assert_eq!(state.dice, DicePanelState::Closed);
    }
}
