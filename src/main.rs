use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use std::{env, process};

use tf_idf_clusterer::{
    ClusterEngine, Partition, PorterStemmer, SimilarityTable, Tokenizer, Vectorizer,
};

fn print_usage() {
    eprintln!("Usage: tf-idf-clusterer [--docs DIR] [--count N] [--stop-words FILE]");
    eprintln!("                        [--sims FILE] [--checkpoints A,B,C] [--out DIR]");
    eprintln!("                        [--save-model FILE]");
    eprintln!("Documents are DIR/1.txt, DIR/2.txt, ... ; without --count the scan");
    eprintln!("stops at the first missing file. Each checkpoint K writes OUT/result_K.txt.");
}

struct Args {
    docs_dir: String,
    count: Option<usize>,
    stop_words: Option<String>,
    sims: Option<String>,
    checkpoints: Vec<usize>,
    out_dir: String,
    save_model: Option<String>,
}

fn parse_args() -> Option<Args> {
    let mut parsed = Args {
        docs_dir: String::from("docs"),
        count: None,
        stop_words: None,
        sims: None,
        checkpoints: vec![20, 13, 8],
        out_dir: String::from("."),
        save_model: None,
    };
    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--docs" => match args.next() {
                Some(v) => parsed.docs_dir = v,
                None => {
                    eprintln!("[error] --docs requires a path");
                    return None;
                }
            },
            "--count" => match args.next().and_then(|v| v.parse::<usize>().ok()) {
                Some(n) if n > 0 => parsed.count = Some(n),
                _ => {
                    eprintln!("[error] --count needs a positive integer");
                    return None;
                }
            },
            "--stop-words" => match args.next() {
                Some(v) => parsed.stop_words = Some(v),
                None => {
                    eprintln!("[error] --stop-words requires a path");
                    return None;
                }
            },
            "--sims" => match args.next() {
                Some(v) => parsed.sims = Some(v),
                None => {
                    eprintln!("[error] --sims requires a path");
                    return None;
                }
            },
            "--checkpoints" => {
                let Some(v) = args.next() else {
                    eprintln!("[error] --checkpoints requires a list like 20,13,8");
                    return None;
                };
                let mut parsed_list = Vec::new();
                for part in v.split(',') {
                    match part.trim().parse::<usize>() {
                        Ok(n) if n > 0 => parsed_list.push(n),
                        _ => {
                            eprintln!("[error] bad checkpoint value: {}", part);
                            return None;
                        }
                    }
                }
                parsed.checkpoints = parsed_list;
            }
            "--out" => match args.next() {
                Some(v) => parsed.out_dir = v,
                None => {
                    eprintln!("[error] --out requires a path");
                    return None;
                }
            },
            "--save-model" => match args.next() {
                Some(v) => parsed.save_model = Some(v),
                None => {
                    eprintln!("[error] --save-model requires a path");
                    return None;
                }
            },
            "-h" | "--help" => {
                print_usage();
                return None;
            }
            other => {
                eprintln!("[warn] unknown argument ignored: {}", other);
            }
        }
    }
    Some(parsed)
}

fn load_stop_words(path: &str) -> std::io::Result<HashSet<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(|l| l.trim().to_ascii_lowercase())
        .filter(|l| !l.is_empty())
        .collect())
}

/// Scan DIR/1.txt, DIR/2.txt, ... into the vectorizer. The corpus is
/// contiguously numbered; the first unreadable file ends the scan (soft,
/// per the input contract) unless an explicit count cut it off first.
fn load_documents(
    dir: &Path,
    count: Option<usize>,
    tokenizer: &Tokenizer,
    vectorizer: &mut Vectorizer,
) -> usize {
    let mut stemmer = PorterStemmer::new();
    let mut loaded = 0usize;
    let mut file_no = 1usize;
    loop {
        if let Some(limit) = count {
            if file_no > limit {
                break;
            }
        }
        let path = dir.join(format!("{}.txt", file_no));
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(_) => {
                if count.is_some() {
                    eprintln!(
                        "[warn] {} unreadable before --count was reached; treating as end of corpus",
                        path.display()
                    );
                }
                break;
            }
        };
        let stems: Vec<String> = tokenizer
            .tokens(&text)
            .iter()
            .map(|tok| stemmer.stem(tok))
            .collect();
        // Internal document ids are 0-based; file numbering is 1-based.
        vectorizer.add_document(file_no - 1, &stems);
        loaded += 1;
        file_no += 1;
    }
    loaded
}

fn write_partition(out_dir: &Path, partition: &Partition) -> std::io::Result<PathBuf> {
    let path = out_dir.join(format!("result_{}.txt", partition.n_clusters()));
    let mut file = File::create(&path)?;
    partition.write_to(&mut file)?;
    Ok(path)
}

fn main() {
    let Some(args) = parse_args() else {
        process::exit(2);
    };
    let start = Instant::now();

    let tokenizer = match &args.stop_words {
        Some(path) => match load_stop_words(path) {
            Ok(words) => {
                eprintln!("[info] loaded {} stop words from {}", words.len(), path);
                Tokenizer::with_stop_words(words)
            }
            Err(e) => {
                eprintln!("[error] failed to read stop words {}: {}", path, e);
                process::exit(1);
            }
        },
        None => Tokenizer::new(),
    };

    eprintln!("[stage] scanning documents in {}", args.docs_dir);
    let mut vectorizer: Vectorizer = Vectorizer::new();
    let loaded = load_documents(
        Path::new(&args.docs_dir),
        args.count,
        &tokenizer,
        &mut vectorizer,
    );
    if loaded == 0 {
        eprintln!("[error] no documents loaded from {}. abort", args.docs_dir);
        process::exit(1);
    }
    eprintln!(
        "[info] loaded {} documents, vocabulary {} terms ({:.2}ms)",
        loaded,
        vectorizer.dictionary().len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let sims = match &args.sims {
        Some(path) => {
            eprintln!("[stage] loading precomputed similarities from {}", path);
            File::open(path)
                .map_err(tf_idf_clusterer::Error::from)
                .and_then(|f| SimilarityTable::from_reader(BufReader::new(f), loaded))
        }
        None => {
            eprintln!("[stage] computing pairwise cosine similarities");
            SimilarityTable::from_vectors(&vectorizer.vectors())
        }
    };
    let sims = match sims {
        Ok(table) => table,
        Err(e) => {
            eprintln!("[error] failed to build similarity table: {}", e);
            process::exit(1);
        }
    };

    if let Some(path) = &args.save_model {
        match vectorizer.to_data().to_cbor().map(|bytes| fs::write(path, bytes)) {
            Ok(Ok(())) => eprintln!("[info] model snapshot written to {}", path),
            Ok(Err(e)) => {
                eprintln!("[error] failed to write model snapshot: {}", e);
                process::exit(1);
            }
            Err(e) => {
                eprintln!("[error] failed to encode model snapshot: {}", e);
                process::exit(1);
            }
        }
    }

    eprintln!(
        "[stage] clustering {} documents down to checkpoints {:?}",
        loaded, args.checkpoints
    );
    let cluster_start = Instant::now();
    let mut engine = match ClusterEngine::new(sims) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("[error] failed to initialize engine: {}", e);
            process::exit(1);
        }
    };
    let snapshots = match engine.run(&args.checkpoints) {
        Ok(snapshots) => snapshots,
        Err(e) => {
            eprintln!("[error] clustering failed: {}", e);
            process::exit(1);
        }
    };
    eprintln!(
        "[info] clustering finished in {:.2}ms, {} snapshot(s)",
        cluster_start.elapsed().as_secs_f64() * 1000.0,
        snapshots.len()
    );

    let out_dir = Path::new(&args.out_dir);
    for partition in &snapshots {
        match write_partition(out_dir, partition) {
            Ok(path) => eprintln!(
                "[info] wrote {} clusters to {}",
                partition.n_clusters(),
                path.display()
            ),
            Err(e) => {
                eprintln!("[error] failed to write partition: {}", e);
                process::exit(1);
            }
        }
    }

    eprintln!(
        "[time] program_total={:.2}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );
}
