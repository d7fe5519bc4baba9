//! Scenario: the three solver inputs built from a parsed description.

use std::collections::HashMap;

use super::types::{CapTable, Investor, NewRound, SafeNote, ValuationType};
use crate::dsl::{CapTableDef, EntryDef, EntryKind, ScenarioAst};
use crate::error::{DilutionError, Result};
use crate::solver::{Solution, Solver};

const CAP_TABLE_PARAMS: &[&str] = &["shares", "fd", "options", "remaining", "pool"];
const SAFE_PARAMS: &[&str] = &["cap", "discount"];

/// A cap table, the notes outstanding against it, and the round they convert into.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scenario {
    pub cap_table: CapTable,
    pub notes: Vec<SafeNote>,
    pub round: NewRound,
}

impl Scenario {
    /// Bundle existing records.
    pub fn new(cap_table: CapTable, notes: Vec<SafeNote>, round: NewRound) -> Self {
        Self {
            cap_table,
            notes,
            round,
        }
    }

    /// Build a scenario from a parsed AST.
    ///
    /// A missing `.captable` or `.round` falls back to the default cap table
    /// and an empty pre-money round at a zero valuation.
    pub fn from_ast(ast: ScenarioAst) -> Result<Self> {
        let cap_table = match &ast.cap_table {
            Some(def) => cap_table_from_def(def)?,
            None => CapTable::default(),
        };

        let mut round = match &ast.round {
            Some(def) => NewRound::new(def.valuation, def.valuation_type.unwrap_or_default()),
            None => NewRound::default(),
        };

        let mut notes = Vec::new();
        for entry in ast.entries {
            match entry.kind {
                EntryKind::Safe => notes.push(note_from_entry(entry)?),
                EntryKind::Investor => round.investors.push(investor_from_entry(entry)?),
            }
        }

        Ok(Self::new(cap_table, notes, round))
    }

    /// Solve with the default solver configuration.
    pub fn solve(&self) -> Solution {
        self.solve_with(&Solver::new())
    }

    /// Solve with the given solver.
    pub fn solve_with(&self, solver: &Solver) -> Solution {
        solver.solve(&self.cap_table, &self.notes, &self.round)
    }
}

fn reject_unknown_params(
    entry: &str,
    params: &HashMap<String, f64>,
    allowed: &[&str],
) -> Result<()> {
    // Lowest name first so the report does not depend on hash order
    match params
        .keys()
        .filter(|k| !allowed.contains(&k.as_str()))
        .min()
    {
        Some(name) => Err(DilutionError::invalid_parameter(
            entry,
            name.as_str(),
            "unknown parameter",
        )),
        None => Ok(()),
    }
}

/// The one alias of a field present in `params`.
fn lookup(
    entry: &str,
    params: &HashMap<String, f64>,
    aliases: &[&str],
) -> Result<Option<(String, f64)>> {
    let mut found = aliases
        .iter()
        .filter_map(|&alias| params.get(alias).map(|&v| (alias, v)));

    match (found.next(), found.next()) {
        (Some((first, _)), Some((second, _))) => Err(DilutionError::invalid_parameter(
            entry,
            second,
            format!("conflicts with '{}'", first),
        )),
        (first, _) => Ok(first.map(|(alias, v)| (alias.to_string(), v))),
    }
}

fn share_count(param: &str, value: f64) -> Result<u64> {
    // u64::MAX rounds up to 2^64 as f64, which is itself out of range
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value >= u64::MAX as f64 {
        return Err(DilutionError::invalid_parameter(
            ".captable",
            param,
            format!("{} is not a whole, non-negative share count", value),
        ));
    }
    Ok(value as u64)
}

fn cap_table_from_def(def: &CapTableDef) -> Result<CapTable> {
    reject_unknown_params(".captable", &def.params, CAP_TABLE_PARAMS)?;

    let mut cap_table = CapTable::default();
    if let Some((name, value)) = lookup(".captable", &def.params, &["shares", "fd"])? {
        cap_table.fully_diluted_shares = share_count(&name, value)?;
    }
    if let Some((name, value)) = lookup(".captable", &def.params, &["options", "remaining"])? {
        cap_table.remaining_options = share_count(&name, value)?;
    }
    if let Some(pool) = def.params.get("pool") {
        cap_table.new_pool_size = *pool;
    }

    Ok(cap_table)
}

fn note_from_entry(entry: EntryDef) -> Result<SafeNote> {
    reject_unknown_params(&entry.id, &entry.params, SAFE_PARAMS)?;

    let principal = entry
        .principal
        .ok_or_else(|| DilutionError::invalid_entry(&entry.id, entry.line, "missing principal"))?;
    let valuation_cap = *entry
        .params
        .get("cap")
        .ok_or_else(|| DilutionError::invalid_entry(&entry.id, entry.line, "missing cap=<valuation>"))?;
    let discount = entry.params.get("discount").copied().unwrap_or(100.0);
    let valuation_type = entry.valuation_type.unwrap_or(ValuationType::PostMoney);

    let name = entry.name.unwrap_or_else(|| entry.id.clone());
    Ok(SafeNote::new(entry.id, name, principal, valuation_cap)
        .with_valuation_type(valuation_type)
        .with_discount(discount))
}

fn investor_from_entry(entry: EntryDef) -> Result<Investor> {
    reject_unknown_params(&entry.id, &entry.params, &[])?;

    if entry.valuation_type.is_some() {
        return Err(DilutionError::invalid_entry(
            &entry.id,
            entry.line,
            "investors take the round's valuation type",
        ));
    }
    let principal = entry
        .principal
        .ok_or_else(|| DilutionError::invalid_entry(&entry.id, entry.line, "missing principal"))?;

    let name = entry.name.unwrap_or_else(|| entry.id.clone());
    Ok(Investor::new(entry.id, name, principal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;

    fn scenario(input: &str) -> Result<Scenario> {
        Scenario::from_ast(dsl::parse(input)?)
    }

    #[test]
    fn test_defaults_when_directives_missing() {
        let scenario = scenario("").unwrap();
        assert_eq!(scenario.cap_table, CapTable::default());
        assert_eq!(scenario.round, NewRound::default());
        assert!(scenario.notes.is_empty());
    }

    #[test]
    fn test_builds_records() {
        let scenario = scenario(
            ".captable fd=8M remaining=250k pool=12.5\n\
             .round post 30M\n\
             SAFE angel \"Angel\" 500k cap=6M discount=85 pre\n\
             SAFE yc 125k cap=$10M\n\
             INVESTOR lead 4M\n",
        )
        .unwrap();

        assert_eq!(scenario.cap_table, CapTable::new(8_000_000, 250_000, 12.5));
        assert_eq!(scenario.round.valuation, 30e6);
        assert_eq!(scenario.round.valuation_type, ValuationType::PostMoney);

        let angel = &scenario.notes[0];
        assert_eq!(angel.name, "Angel");
        assert_eq!(angel.valuation_type, ValuationType::PreMoney);
        assert_eq!(angel.discount, 85.0);

        let yc = &scenario.notes[1];
        assert_eq!(yc.name, "yc");
        assert_eq!(yc.valuation_cap, 10e6);
        assert_eq!(yc.valuation_type, ValuationType::PostMoney);
        assert_eq!(yc.discount, 100.0);

        assert_eq!(scenario.round.investors[0].id, "lead");
        assert_eq!(scenario.round.investors[0].principal, 4e6);
    }

    #[test]
    fn test_round_type_defaults_to_pre_money() {
        let scenario = scenario(".round 9M").unwrap();
        assert_eq!(scenario.round.valuation_type, ValuationType::PreMoney);
    }

    #[test]
    fn test_rejects_bad_entries() {
        assert!(matches!(
            scenario("SAFE a 1M"),
            Err(DilutionError::InvalidEntry { .. })
        ));
        assert!(matches!(
            scenario("SAFE a cap=5M"),
            Err(DilutionError::InvalidEntry { .. })
        ));
        assert!(matches!(
            scenario("SAFE a 1M cap=5M mfn=1"),
            Err(DilutionError::InvalidParameter { .. })
        ));
        assert!(matches!(
            scenario("INVESTOR a 1M post"),
            Err(DilutionError::InvalidEntry { .. })
        ));
        assert!(matches!(
            scenario("INVESTOR a 1M cap=2M"),
            Err(DilutionError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rejects_fractional_share_counts() {
        assert!(matches!(
            scenario(".captable shares=1.5"),
            Err(DilutionError::InvalidParameter { .. })
        ));
        assert!(matches!(
            scenario(".captable options=-10"),
            Err(DilutionError::InvalidParameter { .. })
        ));
        assert!(matches!(
            scenario(".captable warrants=10"),
            Err(DilutionError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_share_counts() {
        match scenario(".captable shares=1e30") {
            Err(DilutionError::InvalidParameter { param, .. }) => assert_eq!(param, "shares"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            scenario(".captable options=18446744073709551616"),
            Err(DilutionError::InvalidParameter { .. })
        ));
        let scenario = scenario(".captable shares=1e15").unwrap();
        assert_eq!(scenario.cap_table.fully_diluted_shares, 1_000_000_000_000_000);
    }

    #[test]
    fn test_rejects_conflicting_aliases() {
        match scenario(".captable shares=5M fd=6M") {
            Err(DilutionError::InvalidParameter { entry, param, .. }) => {
                assert_eq!(entry, ".captable");
                assert_eq!(param, "fd");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            scenario(".captable remaining=1M options=1M"),
            Err(DilutionError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_unknown_parameter_report_is_stable() {
        for _ in 0..20 {
            match scenario("SAFE a 1M cap=5M foo=1 bar=2 baz=3") {
                Err(DilutionError::InvalidParameter { param, .. }) => assert_eq!(param, "bar"),
                other => panic!("unexpected: {:?}", other),
            }
        }
    }

    #[test]
    fn test_solve_uses_records() {
        let scenario = Scenario::new(
            CapTable::new(5_000_000, 500_000, 0.0),
            Vec::new(),
            NewRound::new(11e6, ValuationType::PostMoney)
                .with_investor(Investor::new("lead", "Lead", 1e6)),
        );
        let solution = scenario.solve();
        assert_eq!(solution.share_price, 2.0);
        assert_eq!(solution.results.len(), 3);
    }
}
