//! Performance benchmarks for the payroll engine.
//!
//! Measures run initiation (the full per-employee pipeline plus
//! persistence) and review for units of 10, 100 and 1000 employees, and the
//! HTTP initiation path for 100 employees.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;
use std::sync::Arc;

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use rust_decimal::Decimal;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::engine::PayrollEngine;
use payroll_engine::models::{
    AttendanceRecord, ConfigStatus, Employee, InsuranceBracket, PayGrade, PayrollPeriod, Punch,
    PunchType, TaxRule,
};
use payroll_engine::sources::InMemoryDataSource;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn period() -> PayrollPeriod {
    PayrollPeriod::from_month(2025, 4).unwrap()
}

/// Builds a data source with `employee_count` employees on a full month of
/// attendance, every fifth one missing a day.
fn create_source(employee_count: usize) -> Arc<InMemoryDataSource> {
    let source = InMemoryDataSource::new();
    source
        .add_pay_grade(PayGrade {
            id: "G1".to_string(),
            grade: "Accountant".to_string(),
            base_salary: Decimal::from(6000),
            gross_salary: Decimal::from(6200),
            status: ConfigStatus::Approved,
        })
        .unwrap();
    source
        .add_tax_rule(TaxRule {
            id: "t1".to_string(),
            name: "Income tax".to_string(),
            rate: Decimal::from(10),
            status: ConfigStatus::Approved,
        })
        .unwrap();
    source
        .add_insurance_bracket(InsuranceBracket {
            id: "b1".to_string(),
            name: "Social insurance".to_string(),
            min_salary: Decimal::ZERO,
            max_salary: Decimal::from(10000),
            employee_rate: Decimal::from(5),
            employer_rate: Decimal::from(10),
            status: ConfigStatus::Approved,
        })
        .unwrap();

    let working_days = period().working_days();
    for i in 0..employee_count {
        let id = format!("emp_{:04}", i);
        source
            .add_employee(Employee {
                id: id.clone(),
                employee_number: format!("E-{:04}", i),
                full_name: format!("Employee {}", i),
                unit_id: "finance".to_string(),
                pay_grade_id: Some("G1".to_string()),
                bank_account_number: Some(format!("EG{:010}", i)),
                position_title: Some("Accountant".to_string()),
            })
            .unwrap();

        for (d, day) in working_days.iter().enumerate() {
            if i % 5 == 0 && d == 3 {
                continue;
            }
            source
                .add_attendance(AttendanceRecord {
                    id: format!("{}_{}", id, day),
                    employee_id: id.clone(),
                    date: *day,
                    punches: vec![Punch {
                        punch_type: PunchType::In,
                        time: day.and_hms_opt(9, 0, 0).unwrap(),
                    }],
                    total_work_minutes: 504,
                    finalised_for_payroll: true,
                })
                .unwrap();
        }
    }
    Arc::new(source)
}

fn create_config() -> ConfigLoader {
    ConfigLoader::load("./config/payroll").expect("Failed to load config")
}

/// Benchmark: run initiation at increasing unit sizes.
fn bench_initiate(c: &mut Criterion) {
    let config = create_config();
    let mut group = c.benchmark_group("initiate_payroll");
    group.sample_size(10);

    for employee_count in [10usize, 100, 1000] {
        let source = create_source(employee_count);
        group.throughput(Throughput::Elements(employee_count as u64));
        group.bench_with_input(
            BenchmarkId::new("employees", employee_count),
            &employee_count,
            |b, _| {
                b.iter_batched(
                    || PayrollEngine::new(source.clone(), config.clone()),
                    |engine| {
                        let outcome = engine
                            .initiate_payroll(period(), "finance", "spec_bench")
                            .unwrap();
                        black_box(outcome)
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

/// Benchmark: review over an initiated run.
fn bench_review(c: &mut Criterion) {
    let config = create_config();
    let mut group = c.benchmark_group("review_payroll");

    for employee_count in [10usize, 100, 1000] {
        let engine = PayrollEngine::new(create_source(employee_count), config.clone());
        let run = engine
            .initiate_payroll(period(), "finance", "spec_bench")
            .unwrap()
            .run;

        group.throughput(Throughput::Elements(employee_count as u64));
        group.bench_with_input(
            BenchmarkId::new("employees", employee_count),
            &employee_count,
            |b, _| b.iter(|| black_box(engine.review_payroll(run.id).unwrap())),
        );
    }

    group.finish();
}

/// Benchmark: initiation through the HTTP router.
fn bench_http_initiate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = create_config();
    let source = create_source(100);
    let body = serde_json::json!({
        "period": "2025-04",
        "unit_id": "finance",
        "specialist_id": "spec_bench"
    })
    .to_string();

    c.bench_function("http_initiate_100", |b| {
        b.to_async(&rt).iter_batched(
            || create_router(AppState::new(PayrollEngine::new(source.clone(), config.clone()))),
            |router| {
                let body = body.clone();
                async move {
                    let response = router
                        .oneshot(
                            Request::builder()
                                .method("POST")
                                .uri("/runs")
                                .header("Content-Type", "application/json")
                                .body(Body::from(body))
                                .unwrap(),
                        )
                        .await
                        .unwrap();
                    black_box(response)
                }
            },
            BatchSize::SmallInput,
        )
    });
}

/// Benchmark: period parsing from request strings.
fn bench_period_parse(c: &mut Criterion) {
    c.bench_function("period_parse", |b| {
        b.iter(|| black_box(PayrollPeriod::from_str(black_box("2025-04-01")).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_initiate,
    bench_review,
    bench_http_initiate,
    bench_period_parse,
);
criterion_main!(benches);
