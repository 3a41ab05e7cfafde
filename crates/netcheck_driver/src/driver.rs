//! Assembles the WS1S theory text MONA actually reads and drives a
//! [`SolverHandle`] over it, one property at a time or fanned out across
//! every property a [`Interaction`] names.

use std::time::Duration;

use netcheck_base::{NetcheckError, Result};
use netcheck_model::Interaction;
use rayon::prelude::*;

use crate::solver::SolverHandle;
use crate::verdict::Verdict;

/// Renders every predicate definition [`netcheck_synth::base_theory_definitions`]
/// produces, followed by the interaction's assumption statements in their
/// sorted key order, separated by blank lines.
///
/// This text is shared by every property check against one interaction; callers
/// driving more than one property should render it once and pass it to
/// [`property_script`] as `cached_base_theory`.
pub fn base_theory(interaction: &Interaction) -> String {
    let mut parts: Vec<String> = netcheck_synth::base_theory_definitions(interaction)
        .iter()
        .map(|def| def.render())
        .collect();
    for text in interaction.assumptions.values() {
        parts.push(text.clone());
    }
    parts.join("\n\n")
}

/// Renders the complete script MONA should run to check `name`: the base
/// theory, the property's own predicate definition when it is not the
/// reserved `deadlock` property, and the final obligation statement.
///
/// Pass a previously computed [`base_theory`] result as `cached_base_theory`
/// to avoid re-rendering it once per property.
pub fn property_script(interaction: &Interaction, name: &str, cached_base_theory: Option<&str>) -> Result<String> {
    let base = match cached_base_theory {
        Some(text) => text.to_string(),
        None => base_theory(interaction),
    };
    let mut parts = vec![base];

    if name != "deadlock" {
        let text = interaction
            .properties
            .get(name)
            .ok_or_else(|| NetcheckError::internal(format!("no property named '{name}' in this interaction")))?;
        let def = netcheck_synth::property_definition(&interaction.system, name, text);
        parts.push(def.render());
    }

    let obligation = netcheck_synth::property_check_call(&interaction.system, name);
    parts.push(format!("{};", obligation.render()));

    Ok(parts.join("\n\n"))
}

/// Checks one property, logging its verdict at `debug`/`info`/`warn` as it
/// resolves.
pub fn check(
    interaction: &Interaction,
    name: &str,
    solver: &dyn SolverHandle,
    cached_base_theory: Option<&str>,
    timeout: Duration,
) -> Result<Verdict> {
    let script = property_script(interaction, name, cached_base_theory)?;
    log::debug!("running property '{name}' ({} byte script)", script.len());
    let output = solver.run(&script, timeout)?;
    let verdict = Verdict::classify(&output);
    match &verdict {
        Verdict::Proven => log::info!("property '{name}': proven unreachable"),
        Verdict::NotProven => log::warn!("property '{name}': not proven"),
        Verdict::SolverError(msg) => log::warn!("property '{name}': solver error: {msg}"),
    }
    Ok(verdict)
}

/// Checks every property [`Interaction::property_names`] names, concurrently.
///
/// The base theory is rendered once up front and shared by every check. One
/// property's [`NetcheckError`] (an unknown property name, which cannot
/// actually occur here since the names come from the interaction itself) does
/// not stop the others; its slot carries the `Err` instead.
pub fn check_all(interaction: &Interaction, solver: &dyn SolverHandle, timeout: Duration) -> Vec<(String, Result<Verdict>)> {
    let base = base_theory(interaction);
    let names = interaction.property_names();
    names
        .par_iter()
        .map(|name| {
            let verdict = check(interaction, name, solver, Some(&base), timeout);
            (name.clone(), verdict)
        })
        .collect()
}
