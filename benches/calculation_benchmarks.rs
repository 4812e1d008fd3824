//! Performance benchmarks for the payroll engine.
//!
//! Covers a single pay statement per period type, the stand-alone IMSS and
//! ISR calculators, and payroll batches of 100 and 1000 employees.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use nomina_engine::calculation::{calculate_imss, calculate_isr};
use nomina_engine::config::{ConfigLoader, RateTables};
use nomina_engine::models::{Employee, PeriodType, SalaryZone, WageBasis};
use nomina_engine::payroll::{PayrollOptions, calculate_payroll};

fn load_tables() -> RateTables {
    ConfigLoader::load("./config/mx2025")
        .expect("Failed to load tables")
        .into_tables()
}

fn reference_date() -> NaiveDate {
    // Second September quincena: holiday on the 16th, two Sundays
    NaiveDate::from_ymd_opt(2025, 9, 20).unwrap()
}

/// Creates an employee with a couple of absences and a justified holiday.
fn create_employee(index: usize, period_type: PeriodType) -> Employee {
    let daily = dec!(300.00) + Decimal::from(index % 50) * dec!(10);
    let wage = match period_type {
        PeriodType::Mensual => WageBasis::Monthly(daily * dec!(30)),
        PeriodType::Semanal | PeriodType::Quincenal => WageBasis::Daily(daily),
    };

    Employee {
        id: format!("emp_bench_{:04}", index),
        name: "Empleado de Prueba".to_string(),
        wage,
        hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        rest_days: [(index % 7) as u8].into_iter().collect(),
        salary_zone: SalaryZone::General,
        period_type,
        unjustified_absences: vec!["2025-09-18".to_string(), "2025-09-23".to_string()],
        justified_absences: if index % 3 == 0 {
            vec!["2025-09-16".to_string()]
        } else {
            vec![]
        },
    }
}

fn create_batch(size: usize) -> Vec<Employee> {
    let types = [PeriodType::Semanal, PeriodType::Quincenal, PeriodType::Mensual];
    (0..size)
        .map(|i| create_employee(i, types[i % types.len()]))
        .collect()
}

/// Benchmark: one pay statement for each period type.
fn bench_single_payroll(c: &mut Criterion) {
    let tables = load_tables();
    let options = PayrollOptions::for_date(reference_date());
    let mut group = c.benchmark_group("single_payroll");

    for period_type in PeriodType::ALL {
        let employee = create_employee(1, period_type);
        group.bench_with_input(
            BenchmarkId::new("period", period_type),
            &employee,
            |b, employee| {
                b.iter(|| black_box(calculate_payroll(black_box(employee), &options, &tables)))
            },
        );
    }
    group.finish();
}

/// Benchmark: the stand-alone calculators.
fn bench_calculators(c: &mut Criterion) {
    let tables = load_tables();

    c.bench_function("imss_quincena", |b| {
        b.iter(|| black_box(calculate_imss(black_box(dec!(500.00)), 15)))
    });
    c.bench_function("isr_quincenal", |b| {
        b.iter(|| {
            black_box(calculate_isr(
                black_box(dec!(7500.00)),
                PeriodType::Quincenal,
                &tables,
            ))
        })
    });
}

/// Benchmark: payroll batches.
fn bench_batches(c: &mut Criterion) {
    let tables = load_tables();
    let options = PayrollOptions::for_date(reference_date());
    let mut group = c.benchmark_group("batch");

    for size in [100usize, 1000] {
        let batch = create_batch(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("employees", size), &batch, |b, batch| {
            b.iter(|| {
                let results: Vec<_> = batch
                    .iter()
                    .map(|employee| calculate_payroll(employee, &options, &tables))
                    .collect();
                black_box(results)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_payroll, bench_calculators, bench_batches);
criterion_main!(benches);
