use log::*;
use rand::Rng;

use lcg_engine::{lcg::MASK, Constants, Lcg, RecoverError, MAX_BOUND};

pub fn run(args: super::GenerateArgs, constants: Constants) -> anyhow::Result<()> {
    if !args.bound.is_power_of_two() || args.bound > MAX_BOUND {
        return Err(RecoverError::InvalidBound(args.bound).into());
    }

    let seed = args
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen_range(0, MASK + 1));
    let mut lcg = if args.scramble {
        Lcg::scrambled(constants, seed)
    } else {
        Lcg::new(constants, seed)
    };
    info!("Generating {} outputs from state {}", args.count, lcg.state());

    println!("{}", outputs(&mut lcg, args.bound, args.count).join(","));
    Ok(())
}

fn outputs(lcg: &mut Lcg, bound: u64, count: usize) -> Vec<String> {
    lcg.outputs(bound)
        .take(count)
        .map(|value| value.to_string())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_outputs() {
        let mut lcg = Lcg::scrambled(Constants::JAVA, 42);
        assert_eq!(outputs(&mut lcg, 16, 5).join(","), "11,0,10,0,4");
    }
}
