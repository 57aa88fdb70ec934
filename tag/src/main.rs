use std::fs::File;
use std::io::{prelude::*, stderr, stdin, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use hmm_tagger::{Decoder, Preprocessor, TaggedSentence, Trainer};

#[derive(Parser, Debug)]
#[command(about = "A program to train an HMM part-of-speech tagger and tag sentences.")]
struct Args {
    /// A tagged training corpus with one sentence per line (e.g. `The/DT dog/NN`)
    #[arg(long, required = true)]
    corpus: Vec<PathBuf>,

    /// The character separating a word from its tag
    #[arg(long, default_value = "/")]
    delimiter: char,

    /// Tokens with this tag are removed from the training corpus
    #[arg(long, default_value = "-NONE-")]
    placeholder_tag: String,

    /// The marker substituted for rare and unknown words
    #[arg(long, default_value = "<UNK>")]
    unk: String,

    /// Words occurring at most this many times in the corpus are replaced with the marker
    #[arg(long, default_value = "1")]
    rare_threshold: usize,

    /// A tagged corpus to evaluate instead of tagging sentences from stdin
    #[arg(long)]
    eval: Option<PathBuf>,

    /// Print the surviving states of each decoding step to stderr
    #[arg(long)]
    show_lattice: bool,
}

fn load_corpus(
    path: &Path,
    delimiter: char,
) -> Result<Vec<TaggedSentence>, Box<dyn std::error::Error>> {
    eprintln!("Loading {path:?} ...");
    let f = BufReader::new(File::open(path)?);
    let mut sents = vec![];
    for (i, line) in f.lines().enumerate() {
        if i % 10000 == 0 {
            eprint!("# of sentences: {i}\r");
            stderr().flush()?;
        }
        sents.push(TaggedSentence::from_tagged(line?, delimiter)?);
    }
    eprintln!("# of sentences: {}", sents.len());
    Ok(sents)
}

fn evaluate(
    decoder: &Decoder<'_>,
    preprocessor: &Preprocessor,
    path: &Path,
    delimiter: char,
) -> Result<(), Box<dyn std::error::Error>> {
    let gold_sents = preprocessor.remove_placeholder_tag(load_corpus(path, delimiter)?);

    eprintln!("Start evaluation");
    let mut n_tokens = 0;
    let mut n_correct = 0;
    let mut n_no_path = 0;
    for s in &gold_sents {
        if s.is_empty() {
            continue;
        }
        let words: Vec<&str> = s.words().collect();
        let prediction = decoder.decode(&words);
        if prediction.is_empty() {
            n_no_path += 1;
        }
        n_tokens += s.len();
        n_correct += s
            .tags()
            .zip(prediction.tags())
            .filter(|(r, h)| r == *h)
            .count();
    }
    println!("Accuracy: {}", n_correct as f64 / n_tokens as f64);
    println!("Tokens: {n_tokens}, Correct: {n_correct}, No path: {n_no_path}");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let preprocessor =
        Preprocessor::new(args.placeholder_tag, args.unk)?.rare_threshold(args.rare_threshold);

    eprintln!("Loading dataset...");
    let mut trainer = Trainer::new(preprocessor.clone());
    for path in &args.corpus {
        for s in load_corpus(path, args.delimiter)? {
            trainer.push_sentence(s);
        }
    }

    eprintln!("Start training...");
    let model = trainer.train();
    eprintln!("# of tags: {}", model.tags().len());
    eprintln!("# of words: {}", model.vocabulary().len());
    eprintln!("Finish training.");

    let decoder = Decoder::new(&model);

    if let Some(path) = args.eval {
        return evaluate(&decoder, &preprocessor, &path, args.delimiter);
    }

    eprintln!("Start tagging");
    let mut n_words = 0;
    let start = Instant::now();
    for line in stdin().lock().lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        let prediction = if args.show_lattice {
            let mut steps = decoder.steps(&words);
            for column in steps.by_ref() {
                eprintln!(
                    "Step {}: {:?} -> {:?}",
                    column.position(),
                    words[column.position()],
                    column.word()
                );
                for cell in column.cells() {
                    eprintln!(
                        "  {} <- {}: {:e}",
                        cell.tag(),
                        cell.predecessor().unwrap_or("Start"),
                        cell.probability()
                    );
                }
            }
            steps.finish()
        } else {
            decoder.decode(&words)
        };
        n_words += words.len();
        if prediction.is_empty() && !words.is_empty() {
            eprintln!("No path found: {line}");
            println!("{line}");
            continue;
        }
        let s: TaggedSentence = words
            .iter()
            .copied()
            .zip(prediction.tags().iter().copied())
            .collect();
        println!("{}", s.to_tagged_string(args.delimiter));
        eprintln!("Probability: {:e}", prediction.probability());
    }
    let duration = start.elapsed();
    eprintln!("Elapsed: {} [sec]", duration.as_secs_f64());
    eprintln!(
        "Speed: {} [words/sec]",
        n_words as f64 / duration.as_secs_f64()
    );

    Ok(())
}
