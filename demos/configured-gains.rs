//! Loading a gains model from a YAML parameter file and solving it.
//!
//! Run with `cargo run --example configured-gains`.

use linear_feedback::config::FeedbackConfig;
use nalgebra::DVector;

const PARAMS: &str = "
gains:
  shape: { rows: 2, cols: 4 }
  values: [10.0, 0.0, 1.0, 0.0,
            0.0, 10.0, 0.0, 1.0]
offset:
  size: 2
  values: [0.0, -9.81]
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config: FeedbackConfig = serde_yaml::from_str(PARAMS)?;
    let model = config.build()?;

    let states = [
        DVector::from_vec(vec![0.1, -0.2, 0.0, 0.0]),
        DVector::from_vec(vec![0.0, 0.0, 0.5, -0.5]),
    ];
    for state in &states {
        let command = model.by_ref().solve(state);
        println!("state {} -> command {}", state.transpose(), command.transpose());
    }

    Ok(())
}
