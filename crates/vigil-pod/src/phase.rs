use vigil_model::ResourceState;

/// Orchestrator phase vocabulary, scanned top to bottom, first match wins.
pub static PHASE_TABLE: &[(ResourceState, &[&str])] = &[
    (ResourceState::Creating, &["Pending", "INIT"]),
    (ResourceState::Available, &["Running", "ALLOCATED"]),
    (ResourceState::Destroying, &["Terminating", "PENDING_DELETE"]),
    (ResourceState::Unknown, &["unknown"]),
];

/// Neutral state for an orchestrator phase string. Total: unmatched is `Unknown`.
pub fn map_phase(phase: &str) -> ResourceState {
    let phase = phase.trim();
    PHASE_TABLE
        .iter()
        .find(|(_, candidates)| candidates.iter().any(|c| c.eq_ignore_ascii_case(phase)))
        .map(|(state, _)| *state)
        .unwrap_or(ResourceState::Unknown)
}
