use econsim_core::{BlockReason, DiplomacyAgreement, EntrySlot, EntryVerdict, Owner, Province, Verdict};
use serde::Serialize;
use std::io::Write;

/// JSON shape of a single verdict.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictReport<'a> {
    pub province_id: &'a str,
    pub building_id: &'a str,
    pub owner: &'a Owner,
    pub active: bool,
    pub reasons: Vec<String>,
    pub details: &'a [BlockReason],
}

impl<'a> VerdictReport<'a> {
    pub fn new(province_id: &'a str, building_id: &'a str, owner: &'a Owner, verdict: &'a Verdict) -> Self {
        Self {
            province_id,
            building_id,
            owner,
            active: verdict.is_active(),
            reasons: verdict.messages(),
            details: &verdict.reasons,
        }
    }
}

fn describe_slot(slot: &EntrySlot) -> String {
    match slot {
        EntrySlot::Built { index } => format!("built #{}", index),
        EntrySlot::Construction { index, .. } => format!("construction #{}", index),
    }
}

pub fn print_verdict(report: &VerdictReport<'_>, writer: &mut impl Write) -> std::io::Result<()> {
    let status = if report.active { "ACTIVE" } else { "BLOCKED" };
    writeln!(
        writer,
        "[{}] {} in {} for {}",
        status, report.building_id, report.province_id, report.owner
    )?;
    for reason in &report.reasons {
        writeln!(writer, "       {}", reason)?;
    }
    Ok(())
}

/// Human-readable audit of every placed entry.
pub fn print_audit(
    verdicts: &[EntryVerdict],
    only_inactive: bool,
    writer: &mut impl Write,
) -> std::io::Result<()> {
    let inactive = verdicts.iter().filter(|v| !v.verdict.is_active()).count();

    writeln!(writer, "=== Audit Report ===")?;
    writeln!(
        writer,
        "Total: {} | Active: {} | Inactive: {}",
        verdicts.len(),
        verdicts.len() - inactive,
        inactive
    )?;
    writeln!(writer)?;

    for v in verdicts {
        if only_inactive && v.verdict.is_active() {
            continue;
        }
        let status = if v.verdict.is_active() { "OK" } else { "BLOCKED" };
        writeln!(
            writer,
            "[{}] {} {} ({}) owned by {}",
            status,
            v.entry.province_id,
            v.building_id,
            describe_slot(&v.entry.slot),
            v.owner
        )?;
        for reason in &v.verdict.reasons {
            writeln!(writer, "       {}", reason)?;
        }
    }
    Ok(())
}

pub fn print_eligible(
    building_id: &str,
    owner: &Owner,
    provinces: &[&Province],
    writer: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{} eligible province(s) for {} as {}:",
        provinces.len(),
        building_id,
        owner
    )?;
    for province in provinces {
        writeln!(
            writer,
            "  {} (owner: {})",
            province.id,
            province.owner_country_id.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

fn describe_list(ids: &[String]) -> String {
    if ids.is_empty() {
        "any".to_string()
    } else {
        ids.join(",")
    }
}

fn describe_limit(limit: Option<u32>) -> String {
    match limit.filter(|&l| l > 0) {
        Some(l) => l.to_string(),
        None => "-".to_string(),
    }
}

/// Directional agreement table.
pub fn print_agreements(
    agreements: &[DiplomacyAgreement],
    writer: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(writer, "{} directional agreement(s)", agreements.len())?;
    for a in agreements {
        let terms = &a.terms;
        writeln!(
            writer,
            "{} -> {} [{}] state={} companies={} buildings={} provinces={} industries={} limits={}/{}/{}",
            a.host_country_id,
            a.guest_country_id,
            a.id.as_deref().unwrap_or("-"),
            terms.allows_state(),
            terms.allows_companies(),
            describe_list(&terms.building_ids),
            describe_list(&terms.province_ids),
            describe_list(&terms.industry_ids),
            describe_limit(terms.limits.per_province),
            describe_limit(terms.limits.per_country),
            describe_limit(terms.limits.global),
        )?;
    }
    Ok(())
}
