//! Pure reconciliation: join applicants to employees, split the matches into
//! valid time-to-hire rows and anomalies, and aggregate statuses.
//!
//! Nothing here touches a store. The functions take the base records as
//! slices and return fresh relations, which keeps them testable against plain
//! fixtures.
//!
//! # Join semantics
//!
//! Applicants and employees are joined on [`join_key`] equality alone. The key
//! is not unique, so the join is many-to-many: an applicant whose name matches
//! two employees produces two rows. Pairs are emitted applicant-major, in input
//! order, so repeated runs over the same input produce the same output.

use std::collections::{BTreeMap, HashMap};

use crate::{
  derived::{
    ANOMALY_REASON, AnomalyRecord, DerivedRelations, StatusSummaryRecord,
    TimeToHireRecord,
  },
  record::{Applicant, Employee, join_key},
};

/// The full output of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
  pub relations: DerivedRelations,
  pub anomalies: Vec<AnomalyRecord>,
}

/// How a matched applicant/employee pair is classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pairing {
  Valid(TimeToHireRecord),
  Anomaly(AnomalyRecord),
}

/// Every (applicant, employee) pair whose names share a join key.
pub fn matched_pairs<'a>(
  employees: &'a [Employee],
  applicants: &'a [Applicant],
) -> impl Iterator<Item = (&'a Applicant, &'a Employee)> + 'a {
  let mut by_key: HashMap<String, Vec<&'a Employee>> = HashMap::new();
  for employee in employees {
    if let Some(key) = join_key(&employee.name) {
      by_key.entry(key).or_default().push(employee);
    }
  }

  applicants.iter().flat_map(move |applicant| {
    join_key(&applicant.name)
      .and_then(|key| by_key.get(&key).cloned())
      .unwrap_or_default()
      .into_iter()
      .map(move |employee| (applicant, employee))
  })
}

/// Classify one matched pair.
///
/// Returns `None` when either date is missing; such pairs are excluded from
/// both the published relation and the anomaly set.
pub fn classify(applicant: &Applicant, employee: &Employee) -> Option<Pairing> {
  let application_date = applicant.application_date?;
  let hire_date = employee.hire_date?;
  let days = (hire_date - application_date).num_days();

  let pairing = if days >= 0 {
    Pairing::Valid(TimeToHireRecord {
      name: join_key(&applicant.name).unwrap_or_default(),
      role: applicant.role.clone(),
      application_date,
      hire_date,
      department: employee.department.clone(),
      time_to_hire_days: days,
    })
  } else {
    Pairing::Anomaly(AnomalyRecord {
      name: applicant.name.clone(),
      role: applicant.role.clone(),
      application_date,
      hire_date,
      department: employee.department.clone(),
      error_reason: ANOMALY_REASON.to_owned(),
    })
  };
  Some(pairing)
}

/// Build the `time_to_hire` relation.
pub fn time_to_hire(
  employees: &[Employee],
  applicants: &[Applicant],
) -> Vec<TimeToHireRecord> {
  reconcile(employees, applicants).relations.time_to_hire
}

/// Build the anomaly set: the complement of [`time_to_hire`] over matched
/// pairs with both dates present.
pub fn anomalies(
  employees: &[Employee],
  applicants: &[Applicant],
) -> Vec<AnomalyRecord> {
  reconcile(employees, applicants).anomalies
}

/// Count applicants per distinct status, case-sensitively.
///
/// Rows come out in ascending status order.
pub fn status_summary(applicants: &[Applicant]) -> Vec<StatusSummaryRecord> {
  let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
  for applicant in applicants {
    *counts.entry(applicant.status.as_str()).or_default() += 1;
  }
  counts
    .into_iter()
    .map(|(status, count)| StatusSummaryRecord {
      status: status.to_owned(),
      count,
    })
    .collect()
}

/// Run the whole reconciliation in a single pass over the matched pairs.
pub fn reconcile(
  employees: &[Employee],
  applicants: &[Applicant],
) -> Reconciliation {
  let mut out = Reconciliation::default();

  for (applicant, employee) in matched_pairs(employees, applicants) {
    match classify(applicant, employee) {
      Some(Pairing::Valid(row)) => out.relations.time_to_hire.push(row),
      Some(Pairing::Anomaly(row)) => out.anomalies.push(row),
      None => {}
    }
  }
  out.relations.status_summary = status_summary(applicants);

  out
}
