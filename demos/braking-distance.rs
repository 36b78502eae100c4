//! Stopping distance and a braking law, with the unit system doing the
//! dimensional bookkeeping.
//!
//! Run with `cargo run --example braking-distance`.

use linear_feedback::{equation, Pd};
use uom::si::acceleration::meter_per_second_squared;
use uom::si::f64::{Acceleration, Frequency, Length, Time, Velocity};
use uom::si::frequency::hertz;
use uom::si::length::meter;
use uom::si::time::second;
use uom::si::velocity::meter_per_second;

fn main() {
    let speed = Velocity::new::<meter_per_second>(20.0);
    let reaction = Time::new::<second>(1.5);
    let braking = Acceleration::new::<meter_per_second_squared>(6.0);

    // stopping distance = v*t_react + (v / 2a)*v; the second coefficient is
    // a Time, and the compiler holds every term to landing on a Length.
    let stopping = equation!(Length::new::<meter>(0.0); speed, speed / (2.0 * braking));
    let distance = stopping.solve((reaction, speed));
    println!(
        "from {:.1} m/s, you stop in {:.1} m",
        speed.get::<meter_per_second>(),
        distance.get::<meter>()
    );

    // a position-error PD law commanding velocity: kp must carry 1/s for the
    // proportional term to be a Velocity at all.
    let law = Pd::new(Frequency::new::<hertz>(0.8), 0.3);
    let error = Length::new::<meter>(-4.0);
    let error_rate = Velocity::new::<meter_per_second>(1.2);
    let command: Velocity = law.solve(error, error_rate);
    println!(
        "holding position: command {:.2} m/s",
        command.get::<meter_per_second>()
    );
}
