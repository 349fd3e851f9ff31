use std::{fs, io::Cursor, path::PathBuf};

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pyseer_plot::{
    ConversionConfig, convert_gwas_file,
    gwas::{Columns, Reader, parse_position},
    transform::{DEFAULT_ZERO_P_SENTINEL, neg_log10},
};
use tempfile::{NamedTempFile, tempdir};

fn create_gwas_table(dir: &tempfile::TempDir, rows: usize) -> PathBuf {
    let path = dir.path().join("gwas.tsv");
    let mut contents = String::from("variant\taf\tlrt-pvalue\tbeta\n");
    for i in 1..=rows {
        contents.push_str(&format!("contig_{i}_A_T\t0.12\t0.0{i}\t1.5\n"));
    }
    fs::write(&path, contents).unwrap();
    path
}

fn bench_row_parsing(c: &mut Criterion) {
    let mut contents = String::from("variant\tlrt-pvalue\n");
    for i in 0..1000 {
        contents.push_str(&format!("contig_{i}_A_T\t0.00{i}\n"));
    }
    let data = contents.into_bytes();

    c.bench_function("row_parsing", |b| {
        b.iter(|| {
            let mut reader = Reader::new(Cursor::new(&data));
            let header = reader.read_header().unwrap().unwrap();
            let columns = Columns::resolve(&header, "variant", None).unwrap();
            for row in reader {
                let row = row.unwrap();
                let bp = parse_position(&row.fields[columns.variant], "_", 1);
                black_box(&bp);
            }
        });
    });
}

fn bench_transform(c: &mut Criterion) {
    let p_values: Vec<f64> = (1..=1000).map(|i| 1.0 / f64::from(i)).collect();

    c.bench_function("neg_log10", |b| {
        b.iter(|| {
            for &p in &p_values {
                black_box(neg_log10(p, DEFAULT_ZERO_P_SENTINEL).unwrap());
            }
        });
    });
}

fn bench_conversion_pipeline(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let input_path = create_gwas_table(&dir, 1000);
    let dir_path = dir.path().to_path_buf();

    let mut group = c.benchmark_group("conversion_pipeline");
    group.bench_function(BenchmarkId::new("plot", 1000), |b| {
        b.iter_batched(
            || {
                let output = NamedTempFile::new_in(&dir_path).unwrap();
                let config =
                    ConversionConfig::new(input_path.clone(), output.path().to_path_buf());
                (output, config)
            },
            |(output, config)| {
                convert_gwas_file(&config).expect("conversion");
                output.close().unwrap();
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    conversion_benches,
    bench_row_parsing,
    bench_transform,
    bench_conversion_pipeline
);
criterion_main!(conversion_benches);
