use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use netla::{Balance, DMat, DVec, GeevxOutputs, SyevWhich};
use netla_bench::*;

const SIZES: &[usize] = &[32, 64, 128, 256];
const EIGEN_SIZES: &[usize] = &[16, 32, 64, 128];

fn dgesv(c: &mut Criterion) {
    let mut group = c.benchmark_group("dgesv");

    for &n in SIZES {
        group.throughput(Throughput::Elements((n * n * n) as u64));
        for backend in netla::backends() {
            group.bench_with_input(BenchmarkId::new(backend.name(), n), &n, |b, &n| {
                let a = random_dmat(n);
                let rhs = random_rhs(n, 4);
                b.iter(|| {
                    let (mut a, mut x) = (a.clone(), rhs.clone());
                    let info = netla::dgesv_with(backend, &mut a, None, &mut x).unwrap();
                    black_box((info, x))
                })
            });
        }
    }

    group.finish();
}

fn lu_factor_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("dgetrf_dgetrs");

    for &n in SIZES {
        for backend in netla::backends() {
            group.bench_with_input(BenchmarkId::new(backend.name(), n), &n, |b, &n| {
                let a = random_dmat(n);
                let rhs = random_rhs(n, 1);
                b.iter(|| {
                    let mut lu = a.clone();
                    let mut ipiv = DVec::default();
                    netla::dgetrf_with(backend, &mut lu, Some(&mut ipiv)).unwrap();
                    let mut x = rhs.clone();
                    netla::dgetrs_with(backend, netla::Transpose::No, &lu, &ipiv, &mut x).unwrap();
                    black_box(x)
                })
            });
        }
    }

    group.finish();
}

fn dsyevr(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsyevr");

    for &n in EIGEN_SIZES {
        for backend in netla::backends() {
            group.bench_with_input(BenchmarkId::new(backend.name(), n), &n, |b, &n| {
                let a = random_spd_dmat(n);
                b.iter(|| {
                    let (mut values, mut vectors) = (DVec::default(), DMat::default());
                    netla::dsyevr_with(
                        backend,
                        &a,
                        SyevWhich::All,
                        0.0,
                        Some(&mut values),
                        Some(&mut vectors),
                        None,
                    )
                    .unwrap();
                    black_box((values, vectors))
                })
            });
        }
    }

    group.finish();
}

fn dgeev(c: &mut Criterion) {
    let mut group = c.benchmark_group("dgeev");

    for &n in EIGEN_SIZES {
        for backend in netla::backends() {
            group.bench_with_input(BenchmarkId::new(backend.name(), n), &n, |b, &n| {
                let a = random_dmat(n);
                b.iter(|| {
                    let (mut wr, mut wi) = (DVec::default(), DVec::default());
                    let mut vr = DMat::default();
                    let (wr_out, wi_out) = (Some(&mut wr), Some(&mut wi));
                    netla::dgeev_with(backend, &a, wr_out, wi_out, None, Some(&mut vr)).unwrap();
                    black_box((wr, wi, vr))
                })
            });
        }
    }

    group.finish();
}

fn dgeevx(c: &mut Criterion) {
    let mut group = c.benchmark_group("dgeevx_balanced");

    for &n in &EIGEN_SIZES[..3] {
        for backend in netla::backends() {
            group.bench_with_input(BenchmarkId::new(backend.name(), n), &n, |b, &n| {
                let a = random_dmat(n);
                b.iter(|| {
                    let (mut wr, mut rconde) = (DVec::default(), DVec::default());
                    let report = netla::dgeevx_with(
                        backend,
                        Balance::Both,
                        &a,
                        GeevxOutputs {
                            values_real: Some(&mut wr),
                            rconde: Some(&mut rconde),
                            ..Default::default()
                        },
                    )
                    .unwrap();
                    black_box((report, wr, rconde))
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, dgesv, lu_factor_solve, dsyevr, dgeev, dgeevx);
criterion_main!(benches);
