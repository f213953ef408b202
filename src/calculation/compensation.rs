//! Compensation resolution: gross salary, tax and insurance.
//!
//! This module turns an employee's pay grade and the approved payroll
//! configuration into gross salary, the per-rule tax breakdown, the
//! per-bracket insurance breakdown, and net salary.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Allowance, AuditStep, ConfigStatus, Employee, InsuranceBracket, InsuranceContribution,
    PayGrade, PayslipLine, TaxDeduction, TaxRule,
};

/// Snapshot of the approved payroll configuration used for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompensationRules {
    /// Approved ad-hoc allowances.
    pub allowances: Vec<Allowance>,
    /// Approved tax rules.
    pub tax_rules: Vec<TaxRule>,
    /// Approved insurance brackets.
    pub insurance_brackets: Vec<InsuranceBracket>,
}

impl CompensationRules {
    /// Builds a snapshot, dropping anything that is not approved.
    pub fn approved(
        allowances: Vec<Allowance>,
        tax_rules: Vec<TaxRule>,
        insurance_brackets: Vec<InsuranceBracket>,
    ) -> Self {
        Self {
            allowances: allowances
                .into_iter()
                .filter(|a| a.status == ConfigStatus::Approved)
                .collect(),
            tax_rules: tax_rules
                .into_iter()
                .filter(|t| t.status == ConfigStatus::Approved)
                .collect(),
            insurance_brackets: insurance_brackets
                .into_iter()
                .filter(|b| b.status == ConfigStatus::Approved)
                .collect(),
        }
    }
}

/// The result of resolving an employee's compensation.
#[derive(Debug, Clone)]
pub struct CompensationResult {
    /// Pay grade base salary.
    pub base_salary: Decimal,
    /// Pay grade gross plus approved ad-hoc allowances.
    pub gross_salary: Decimal,
    /// Ad-hoc allowances included in gross.
    pub allowances: Vec<PayslipLine>,
    /// One entry per approved tax rule.
    pub taxes: Vec<TaxDeduction>,
    /// Sum of `taxes`.
    pub total_tax: Decimal,
    /// One entry per bracket containing gross.
    pub insurances: Vec<InsuranceContribution>,
    /// Employee-side insurance; deducted.
    pub total_insurance_employee: Decimal,
    /// Employer-side insurance; informational.
    pub total_insurance_employer: Decimal,
    /// `gross - total_tax - total_insurance_employee`.
    pub net_salary: Decimal,
    /// Audit steps for gross, tax and insurance, in that order.
    pub audit_steps: Vec<AuditStep>,
}

fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount * rate / Decimal::ONE_HUNDRED
}

/// Resolves gross salary, tax, insurance and net salary for one employee.
///
/// `pay_grade` is the record referenced by the employee, if the lookup found
/// one. A missing or unapproved grade yields
/// [`EngineError::ConfigurationMissing`].
///
/// Tax is a flat sum: every approved rule contributes `gross × rate / 100`
/// against the full gross. Every insurance bracket whose inclusive
/// `[min_salary, max_salary]` contains gross contributes; overlapping
/// brackets all apply.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{resolve_compensation, CompensationRules};
/// use payroll_engine::models::{ConfigStatus, Employee, InsuranceBracket, PayGrade, TaxRule};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     employee_number: "E-001".to_string(),
///     full_name: "Mona Adel".to_string(),
///     unit_id: "finance".to_string(),
///     pay_grade_id: Some("G1".to_string()),
///     bank_account_number: Some("EG38".to_string()),
///     position_title: None,
/// };
/// let grade = PayGrade {
///     id: "G1".to_string(),
///     grade: "Accountant".to_string(),
///     base_salary: Decimal::from(6000),
///     gross_salary: Decimal::from(6200),
///     status: ConfigStatus::Approved,
/// };
/// let rules = CompensationRules::approved(
///     vec![],
///     vec![TaxRule {
///         id: "tax_1".to_string(),
///         name: "Income tax".to_string(),
///         rate: Decimal::from(10),
///         status: ConfigStatus::Approved,
///     }],
///     vec![InsuranceBracket {
///         id: "ins_1".to_string(),
///         name: "Social insurance".to_string(),
///         min_salary: Decimal::ZERO,
///         max_salary: Decimal::from(10000),
///         employee_rate: Decimal::from(5),
///         employer_rate: Decimal::from(10),
///         status: ConfigStatus::Approved,
///     }],
/// );
///
/// let result = resolve_compensation(&employee, Some(&grade), &rules, 1).unwrap();
/// assert_eq!(result.total_tax, Decimal::from(620));
/// assert_eq!(result.total_insurance_employee, Decimal::from(310));
/// assert_eq!(result.net_salary, Decimal::from(5270));
/// ```
pub fn resolve_compensation(
    employee: &Employee,
    pay_grade: Option<&PayGrade>,
    rules: &CompensationRules,
    step_number: u32,
) -> EngineResult<CompensationResult> {
    let grade = pay_grade.ok_or_else(|| EngineError::ConfigurationMissing {
        employee_id: employee.id.clone(),
        message: match &employee.pay_grade_id {
            Some(id) => format!("pay grade '{}' not found", id),
            None => "no pay grade assigned".to_string(),
        },
    })?;

    if grade.status != ConfigStatus::Approved {
        return Err(EngineError::ConfigurationMissing {
            employee_id: employee.id.clone(),
            message: format!("pay grade '{}' is {}, not APPROVED", grade.id, grade.status),
        });
    }

    let allowances: Vec<PayslipLine> = rules
        .allowances
        .iter()
        .map(|a| PayslipLine {
            name: a.name.clone(),
            amount: a.amount,
        })
        .collect();
    let allowances_total: Decimal = allowances.iter().map(|a| a.amount).sum();
    let gross_salary = grade.gross_salary + allowances_total;

    let gross_step = AuditStep {
        step_number,
        rule_id: "gross_salary".to_string(),
        rule_name: "Gross Salary".to_string(),
        input: serde_json::json!({
            "pay_grade_id": grade.id,
            "base_salary": grade.base_salary.to_string(),
            "pay_grade_gross": grade.gross_salary.to_string(),
            "approved_allowances": allowances.len()
        }),
        output: serde_json::json!({
            "allowances_total": allowances_total.to_string(),
            "gross_salary": gross_salary.to_string()
        }),
        reasoning: format!(
            "Pay grade gross ${} + {} approved allowance(s) ${} = ${}",
            grade.gross_salary.normalize(),
            allowances.len(),
            allowances_total.normalize(),
            gross_salary.normalize()
        ),
    };

    let taxes: Vec<TaxDeduction> = rules
        .tax_rules
        .iter()
        .map(|rule| TaxDeduction {
            rule_id: rule.id.clone(),
            name: rule.name.clone(),
            rate: rule.rate,
            amount: percent_of(gross_salary, rule.rate),
        })
        .collect();
    let total_tax: Decimal = taxes.iter().map(|t| t.amount).sum();

    let tax_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "tax".to_string(),
        rule_name: "Tax Deduction".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "rules": taxes.iter().map(|t| serde_json::json!({
                "rule_id": t.rule_id,
                "rate": t.rate.to_string()
            })).collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "total_tax": total_tax.to_string()
        }),
        reasoning: format!(
            "{} approved tax rule(s) applied at flat rates to gross ${}: ${}",
            taxes.len(),
            gross_salary.normalize(),
            total_tax.normalize()
        ),
    };

    let insurances: Vec<InsuranceContribution> = rules
        .insurance_brackets
        .iter()
        .filter(|b| b.applies_to(gross_salary))
        .map(|b| InsuranceContribution {
            bracket_id: b.id.clone(),
            name: b.name.clone(),
            employee_rate: b.employee_rate,
            employer_rate: b.employer_rate,
            employee_amount: percent_of(gross_salary, b.employee_rate),
            employer_amount: percent_of(gross_salary, b.employer_rate),
        })
        .collect();
    let total_insurance_employee: Decimal = insurances.iter().map(|i| i.employee_amount).sum();
    let total_insurance_employer: Decimal = insurances.iter().map(|i| i.employer_amount).sum();

    let insurance_step = AuditStep {
        step_number: step_number + 2,
        rule_id: "insurance".to_string(),
        rule_name: "Insurance Contributions".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "approved_brackets": rules.insurance_brackets.len()
        }),
        output: serde_json::json!({
            "applicable_brackets": insurances.iter().map(|i| i.bracket_id.clone()).collect::<Vec<_>>(),
            "employee_total": total_insurance_employee.to_string(),
            "employer_total": total_insurance_employer.to_string()
        }),
        reasoning: format!(
            "{} of {} bracket(s) contain gross ${}: employee ${}, employer ${}",
            insurances.len(),
            rules.insurance_brackets.len(),
            gross_salary.normalize(),
            total_insurance_employee.normalize(),
            total_insurance_employer.normalize()
        ),
    };

    let net_salary = gross_salary - total_tax - total_insurance_employee;

    Ok(CompensationResult {
        base_salary: grade.base_salary,
        gross_salary,
        allowances,
        taxes,
        total_tax,
        insurances,
        total_insurance_employee,
        total_insurance_employer,
        net_salary,
        audit_steps: vec![gross_step, tax_step, insurance_step],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee() -> Employee {
        Employee {
            id: "emp_001".to_string(),
            employee_number: "E-001".to_string(),
            full_name: "Mona Adel".to_string(),
            unit_id: "finance".to_string(),
            pay_grade_id: Some("G1".to_string()),
            bank_account_number: Some("EG3800190005".to_string()),
            position_title: Some("Accountant".to_string()),
        }
    }

    fn grade(status: ConfigStatus) -> PayGrade {
        PayGrade {
            id: "G1".to_string(),
            grade: "Accountant".to_string(),
            base_salary: dec("6000"),
            gross_salary: dec("6200"),
            status,
        }
    }

    fn tax(id: &str, rate: &str) -> TaxRule {
        TaxRule {
            id: id.to_string(),
            name: format!("Tax {}", id),
            rate: dec(rate),
            status: ConfigStatus::Approved,
        }
    }

    fn bracket(id: &str, min: &str, max: &str, employee: &str, employer: &str) -> InsuranceBracket {
        InsuranceBracket {
            id: id.to_string(),
            name: format!("Bracket {}", id),
            min_salary: dec(min),
            max_salary: dec(max),
            employee_rate: dec(employee),
            employer_rate: dec(employer),
            status: ConfigStatus::Approved,
        }
    }

    fn scenario_rules() -> CompensationRules {
        CompensationRules::approved(
            vec![],
            vec![tax("t1", "10")],
            vec![bracket("b1", "0", "10000", "5", "10")],
        )
    }

    /// CO-001: reference scenario
    #[test]
    fn test_co_001_reference_scenario() {
        let result =
            resolve_compensation(&create_test_employee(), Some(&grade(ConfigStatus::Approved)), &scenario_rules(), 1)
                .unwrap();

        assert_eq!(result.base_salary, dec("6000"));
        assert_eq!(result.gross_salary, dec("6200"));
        assert_eq!(result.total_tax, dec("620"));
        assert_eq!(result.total_insurance_employee, dec("310"));
        assert_eq!(result.total_insurance_employer, dec("620"));
        assert_eq!(result.net_salary, dec("5270"));
        assert_eq!(result.audit_steps.len(), 3);
        assert_eq!(result.audit_steps[1].step_number, 2);
    }

    /// CO-002: missing pay grade
    #[test]
    fn test_co_002_missing_pay_grade() {
        let result = resolve_compensation(&create_test_employee(), None, &scenario_rules(), 1);
        match result {
            Err(EngineError::ConfigurationMissing { employee_id, message }) => {
                assert_eq!(employee_id, "emp_001");
                assert!(message.contains("'G1' not found"));
            }
            other => panic!("Expected ConfigurationMissing, got {:?}", other),
        }
    }

    /// CO-003: draft pay grade is unusable
    #[test]
    fn test_co_003_unapproved_pay_grade() {
        let result = resolve_compensation(
            &create_test_employee(),
            Some(&grade(ConfigStatus::Draft)),
            &scenario_rules(),
            1,
        );
        assert!(matches!(result, Err(EngineError::ConfigurationMissing { .. })));
    }

    /// CO-004: ad-hoc allowances apply to everyone on top of pay grade gross
    #[test]
    fn test_co_004_adhoc_allowances_added_to_gross() {
        let rules = CompensationRules::approved(
            vec![
                Allowance {
                    id: "a1".to_string(),
                    name: "Transportation".to_string(),
                    amount: dec("300"),
                    status: ConfigStatus::Approved,
                },
                Allowance {
                    id: "a2".to_string(),
                    name: "Housing".to_string(),
                    amount: dec("1000"),
                    status: ConfigStatus::Draft,
                },
            ],
            vec![],
            vec![],
        );
        let result =
            resolve_compensation(&create_test_employee(), Some(&grade(ConfigStatus::Approved)), &rules, 1)
                .unwrap();

        assert_eq!(result.gross_salary, dec("6500"));
        assert_eq!(result.allowances.len(), 1);
        assert_eq!(result.allowances[0].name, "Transportation");
        assert_eq!(result.net_salary, dec("6500"));
    }

    /// CO-005: overlapping brackets all apply, non-containing brackets do not
    #[test]
    fn test_co_005_overlapping_brackets() {
        let rules = CompensationRules::approved(
            vec![],
            vec![],
            vec![
                bracket("b1", "0", "10000", "5", "10"),
                bracket("b2", "6000", "7000", "1", "2"),
                bracket("b3", "7000", "20000", "3", "3"),
            ],
        );
        let result =
            resolve_compensation(&create_test_employee(), Some(&grade(ConfigStatus::Approved)), &rules, 1)
                .unwrap();

        let ids: Vec<&str> = result.insurances.iter().map(|i| i.bracket_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
        assert_eq!(result.total_insurance_employee, dec("372")); // 310 + 62
        assert_eq!(result.total_insurance_employer, dec("744")); // 620 + 124
    }

    /// CO-006: several tax rules sum as flat rates against full gross
    #[test]
    fn test_co_006_flat_tax_sum() {
        let rules = CompensationRules::approved(
            vec![],
            vec![tax("t1", "10"), tax("t2", "2.5")],
            vec![],
        );
        let result =
            resolve_compensation(&create_test_employee(), Some(&grade(ConfigStatus::Approved)), &rules, 1)
                .unwrap();

        assert_eq!(result.taxes.len(), 2);
        assert_eq!(result.taxes[1].amount, dec("155"));
        assert_eq!(result.total_tax, dec("775"));
    }

    proptest! {
        #[test]
        fn prop_total_tax_is_sum_of_flat_rates(
            gross_cents in 0i64..100_000_000,
            rates in proptest::collection::vec(0u32..5000, 0..6),
        ) {
            let gross = Decimal::new(gross_cents, 2);
            let pay_grade = PayGrade {
                gross_salary: gross,
                ..grade(ConfigStatus::Approved)
            };
            let tax_rules: Vec<TaxRule> = rates
                .iter()
                .enumerate()
                .map(|(i, r)| TaxRule {
                    id: format!("t{}", i),
                    name: format!("Tax {}", i),
                    rate: Decimal::new(*r as i64, 2),
                    status: ConfigStatus::Approved,
                })
                .collect();
            let expected: Decimal = tax_rules
                .iter()
                .map(|r| gross * r.rate / Decimal::ONE_HUNDRED)
                .sum();

            let rules = CompensationRules::approved(vec![], tax_rules, vec![]);
            let result = resolve_compensation(&create_test_employee(), Some(&pay_grade), &rules, 1).unwrap();

            prop_assert_eq!(result.total_tax, expected);
            prop_assert_eq!(result.net_salary, gross - expected);
        }
    }
}
