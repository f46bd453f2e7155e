//! Renders an unvoiced fricative (/s/-like) from a single parallel-branch
//! frame driven entirely by frication noise, with no glottal excitation.

use std::fs::File;
use std::io::{BufWriter, Write};

use klatt_cascade::{FrameParams, GlottalSourceKind, MainParams, ParallelParams, generate_sound};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let main = MainParams::new(44100, GlottalSourceKind::Impulsive)?;

    let parallel = ParallelParams {
        enabled: true,
        frication_db: -10.0,
        bypass_db: -20.0,
        oral_formant_db: [-99.0, -99.0, -99.0, -10.0, -15.0, -20.0],
        ..Default::default()
    };

    let frame = FrameParams::new(0.4, 0.0)
        .with_oral_formants(&[
            (0.0, 0.0),
            (0.0, 0.0),
            (0.0, 0.0),
            (4300.0, 400.0),
            (5200.0, 500.0),
            (6300.0, 600.0),
        ])
        .with_parallel(parallel);

    let samples = generate_sound(main, &[frame])?;
    log::info!("rendered {} samples at {} Hz", samples.len(), main.sample_rate);

    let file = File::create("unvoiced_frication.f64")?;
    let mut writer = BufWriter::new(file);
    for sample in &samples {
        writer.write_all(&sample.to_le_bytes())?;
    }

    Ok(())
}
