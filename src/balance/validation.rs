use super::params::BalanceParams;

/// Validate balancing parameters at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_params(params: &BalanceParams) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if params.team_size < 1 {
        errors.push("balance.team_size: must be at least 1".to_string());
    }

    if !params.win_weight.is_finite() || params.win_weight < 0.0 {
        errors.push(format!(
            "balance.win_weight: must be a non-negative number, got {}",
            params.win_weight
        ));
    }

    if params.workers < 1 {
        errors.push("balance.workers: must be at least 1".to_string());
    }

    // Quotas that can never be met by a team of this size
    if params.team_size >= 1 {
        if params.min_midfielders.saturating_add(params.min_forwards) > params.team_size {
            errors.push(format!(
                "balance: min_midfielders ({}) + min_forwards ({}) exceed team_size ({})",
                params.min_midfielders, params.min_forwards, params.team_size
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
