//! Benchmarks for file-to-project partitioning.
//!
//! Run with: cargo bench -p analyzer --bench partition_bench

use analyzer::partition_by_project;
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use depsnap_core::ProjectDescriptor;
use hasher::FileHashes;

fn synthetic_repo(projects: usize, files_per_project: usize) -> (Vec<ProjectDescriptor>, FileHashes) {
  let descriptors: Vec<ProjectDescriptor> = (0..projects)
    .map(|i| ProjectDescriptor::new(format!("project-{}", i), format!("packages/project-{}", i)))
    .collect();

  let mut hashes = FileHashes::new();
  for i in 0..projects {
    for f in 0..files_per_project {
      hashes.insert(format!("packages/project-{}/src/file_{}.ts", i, f), format!("{:08x}{:08x}", i, f));
    }
  }
  for f in 0..files_per_project {
    hashes.insert(format!("common/scripts/tool_{}.js", f), format!("ffff{:08x}", f));
  }

  (descriptors, hashes)
}

fn bench_partition(c: &mut Criterion) {
  let mut group = c.benchmark_group("partition");

  for projects in [10, 50, 200] {
    let (descriptors, hashes) = synthetic_repo(projects, 100);

    group.bench_with_input(BenchmarkId::from_parameter(projects), &projects, |b, _| {
      // clone the map in setup so only the partitioning itself is timed
      b.iter_batched(
        || hashes.clone(),
        |hashes| partition_by_project(black_box(&descriptors), hashes),
        BatchSize::LargeInput,
      )
    });
  }

  group.finish();
}

criterion_group!(benches, bench_partition);
criterion_main!(benches);
