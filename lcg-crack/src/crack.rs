use anyhow::Context;
use log::*;
use thiserror::Error;

use lcg_engine::{CancelToken, Constants, Match, Search};

#[derive(Error, Debug, PartialEq)]
enum SampleError {
    #[error("Couldn't convert {0} into a sample")]
    OutOfRange(String),
}

/// Every run of digits in `s` is one sample, anything else separates them.
fn parse_samples(s: &str) -> Result<Vec<i32>, SampleError> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse()
                .map_err(|_| SampleError::OutOfRange(token.to_string()))
        })
        .collect()
}

fn report(m: &Match) -> String {
    let predictions: String = m
        .predictions
        .iter()
        .enumerate()
        .map(|(i, value)| format!("{}: {}\n", i, value))
        .collect();
    format!(
        "======\nSuccess! Found starting state {}\nGenerating next {} outputs:\n\n{}======\n",
        m,
        m.predictions.len(),
        predictions
    )
}

pub fn run(args: super::CrackArgs, constants: Constants) -> anyhow::Result<()> {
    let samples = parse_samples(&args.samples).context("Error reading samples")?;

    let cancel = CancelToken::new();
    let search = Search::new(constants, args.bound, &samples)
        .context("Invalid arguments")?
        .cancel_token(cancel.clone());
    info!(
        "Searching for a state behind {} samples with bound {}",
        samples.len(),
        args.bound
    );

    let mut found = 0;
    for m in search.matches(args.gen) {
        found += 1;
        print!("{}", report(&m));
        if !args.find_all {
            cancel.cancel();
        }
    }

    if found == 0 {
        println!("No matching state found");
    } else {
        debug!("{} matching states", found);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_samples() {
        assert_eq!(parse_samples("1, 12 0;10"), Ok(vec![1, 12, 0, 10]));
        assert_eq!(parse_samples("[3]\n[4]"), Ok(vec![3, 4]));
        assert_eq!(parse_samples(""), Ok(vec![]));
        assert_eq!(
            parse_samples("1 2147483648"),
            Err(SampleError::OutOfRange("2147483648".into()))
        );
    }

    #[test]
    fn test_parse_samples_drops_sign() {
        assert_eq!(parse_samples("-5 6"), Ok(vec![5, 6]));
    }

    #[test]
    fn test_report() {
        let m = Match {
            state: 29803012144720,
            high_bits: 227378937,
            low_bits: 114256,
            predictions: vec![4, 6],
        };
        assert_eq!(
            report(&m),
            "======\n\
             Success! Found starting state 29803012144720 (227378937<<17 + 114256)\n\
             Generating next 2 outputs:\n\
             \n\
             0: 4\n\
             1: 6\n\
             ======\n"
        );
    }
}
