//! Counterpart resolution policy.
//!
//! One function answers "who is the other side of this conversation"
//! for every entry point into the chat view, replacing the role-string
//! branches the original scattered across its navigation handlers.

use crate::session::{Participant, Role, SessionContext};

/// Outcome of resolving the conversation counterpart for a viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterpartResolution {
    /// A concrete counterpart: open the session against this party.
    Counterpart(Participant),

    /// The viewer must pick a client from their dashboard list first.
    /// The chat view redirects rather than guessing.
    RequiresSelection,

    /// No counterpart can exist (admin role, or a victim with no
    /// assignment yet). The chat view redirects to a safe landing.
    NoCounterpart,
}

/// Resolve the counterpart for the viewer described by `ctx`.
///
/// Rules, in priority order:
/// - An explicit navigation counterpart wins, provided the pair is a
///   permitted one (victim with counselor, counselor with victim). An
///   impermissible or empty navigation counterpart is ignored and
///   resolution falls through to the role defaults below.
/// - A victim without a usable navigation counterpart falls back to
///   the cached assigned-counselor record.
/// - A counselor without a usable navigation counterpart has no single
///   implicit counterpart and must select one.
/// - Admins have no chat capability at all.
pub fn resolve_counterpart(ctx: &SessionContext) -> CounterpartResolution {
    if let Some(counterpart) = &ctx.nav_counterpart
        && pair_permitted(ctx.me.role, counterpart.role)
        && !counterpart.id.is_empty()
    {
        return CounterpartResolution::Counterpart(counterpart.clone());
    }

    match ctx.me.role {
        Role::Victim => match &ctx.assigned_counselor {
            Some(counselor) if !counselor.id.is_empty() => {
                CounterpartResolution::Counterpart(counselor.clone())
            },
            _ => CounterpartResolution::NoCounterpart,
        },
        Role::Counselor => CounterpartResolution::RequiresSelection,
        Role::Admin => CounterpartResolution::NoCounterpart,
    }
}

/// Only victim/counselor pairs may converse.
fn pair_permitted(viewer: Role, counterpart: Role) -> bool {
    matches!((viewer, counterpart), (Role::Victim, Role::Counselor) | (
        Role::Counselor,
        Role::Victim
    ))
}
