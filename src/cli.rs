use std::path::PathBuf;

use crate::{
    buffer::CHUNK_SAMPLES,
    error::{Error, Result},
    oscillator::{self, OscillatorBound, OscillatorConfig},
    ramp::{self, CursorUpdate, RampConfig},
    range::NormalRanges,
    sink::emit,
    wav::{self, WavSink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    AccelDecel,
    SpeedCycle,
}

impl Tool {
    pub fn synopsis(self) -> &'static str {
        match self {
            Tool::AccelDecel => "<infile> <outfile> <accel> <normal-range> [<normal-range>...]",
            Tool::SpeedCycle => "<infile> <outfile>",
        }
    }

    fn options(self) -> &'static str {
        match self {
            Tool::AccelDecel => {
                "  <normal-range>         start,stop in seconds\n\
                 \x20 --per-channel-cursor   advance the cursor once per channel sample\n\
                 \x20 --min-speed <speed>    never decelerate below <speed>\n\
                 \x20 --no-reversal-guard    keep running when a reversing cursor\n\
                 \x20                        falls back into a played range"
            }
            Tool::SpeedCycle => {
                "  --unit-bias            oscillate around sin + 1.0\n\
                 \x20 --min-speed <speed>    lower speed bound (default 1.0)\n\
                 \x20 --max-speed <speed>    upper speed bound (default 3.0)\n\
                 \x20 --sample-bound         stop at the interleaved sample count"
            }
        }
    }
}

pub fn usage(program: &str, tool: Tool) -> String {
    format!("Usage: {program} {}\n{}", tool.synopsis(), tool.options())
}

/// Process exit status for a failed run: 2 for a malformed command line,
/// 1 for anything else.
pub fn exit_status(err: &Error) -> u8 {
    match err {
        Error::Usage(_) => 2,
        _ => 1,
    }
}

fn usage_error(message: impl Into<String>) -> Error {
    Error::Usage(message.into())
}

fn parse_number(flag: &str, value: Option<String>) -> Result<f64> {
    let value = value.ok_or_else(|| usage_error(format!("{flag} needs a value")))?;
    value
        .parse()
        .map_err(|_| usage_error(format!("{flag}: {value:?} is not a number")))
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccelDecelArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub acceleration: f64,
    /// Raw `start,stop` second pairs; scaled once the sample rate is known.
    pub ranges: Vec<String>,
    pub cursor_update: CursorUpdate,
    pub min_speed: Option<f64>,
    pub reversal_guard: bool,
}

impl AccelDecelArgs {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut positional = vec![];
        let mut cursor_update = CursorUpdate::PerFrame;
        let mut min_speed = None;
        let mut reversal_guard = true;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--per-channel-cursor" => cursor_update = CursorUpdate::PerChannel,
                "--min-speed" => min_speed = Some(parse_number(&arg, args.next())?),
                "--no-reversal-guard" => reversal_guard = false,
                flag if flag.starts_with("--") => {
                    return Err(usage_error(format!("unknown option {flag}")))
                }
                _ => positional.push(arg),
            }
        }

        if positional.len() < 4 {
            return Err(usage_error(
                "expected an input, an output, an acceleration and at least one normal range",
            ));
        }
        let mut positional = positional.into_iter();
        let input = positional.next().map(PathBuf::from).unwrap_or_default();
        let output = positional.next().map(PathBuf::from).unwrap_or_default();
        let acceleration = parse_number("<accel>", positional.next())?;

        Ok(Self {
            input,
            output,
            acceleration,
            ranges: positional.collect(),
            cursor_update,
            min_speed,
            reversal_guard,
        })
    }

    pub fn config(&self, sample_rate: u32) -> Result<RampConfig> {
        let ranges = NormalRanges::parse_seconds(&self.ranges, sample_rate)?;
        let config = RampConfig::new(self.acceleration, ranges)?
            .with_cursor_update(self.cursor_update)
            .with_reversal_guard(self.reversal_guard);
        match self.min_speed {
            Some(min_speed) => config.with_min_speed(min_speed),
            None => Ok(config),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedCycleArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: OscillatorConfig,
}

impl SpeedCycleArgs {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut positional = vec![];
        let mut unit_bias = false;
        let mut min_speed = 1.0;
        let mut max_speed = 3.0;
        let mut bound = OscillatorBound::Frames;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--unit-bias" => unit_bias = true,
                "--min-speed" => min_speed = parse_number(&arg, args.next())?,
                "--max-speed" => max_speed = parse_number(&arg, args.next())?,
                "--sample-bound" => bound = OscillatorBound::InterleavedSamples,
                flag if flag.starts_with("--") => {
                    return Err(usage_error(format!("unknown option {flag}")))
                }
                _ => positional.push(arg),
            }
        }

        let [input, output]: [String; 2] = positional
            .try_into()
            .map_err(|_| usage_error("expected an input and an output file"))?;

        let config = if unit_bias {
            OscillatorConfig::unit()
        } else {
            OscillatorConfig::default().with_speed_range(min_speed, max_speed)?
        };

        Ok(Self {
            input: input.into(),
            output: output.into(),
            config: config.with_bound(bound),
        })
    }
}

/// Loads, warps and writes one file. Returns the number of samples written.
pub fn run_accel_decel(args: &AccelDecelArgs) -> Result<usize> {
    let (spec, source) = wav::load(&args.input)?;
    let config = args.config(source.sample_rate())?;
    let output = ramp::accel_decel(&source, &config);
    log_levels(source.samples(), output.samples());
    let sink = WavSink::create(&args.output, spec)?;
    emit(&output, sink, CHUNK_SAMPLES)
}

pub fn run_speed_cycle(args: &SpeedCycleArgs) -> Result<usize> {
    let (spec, source) = wav::load(&args.input)?;
    let output = oscillator::speed_cycle(&source, &args.config);
    log_levels(source.samples(), output.samples());
    let sink = WavSink::create(&args.output, spec)?;
    emit(&output, sink, CHUNK_SAMPLES)
}

fn log_levels(input: &[f32], output: &[f32]) {
    tracing::debug!(
        input_rms = crate::power(input),
        output_rms = crate::power(output),
        "levels"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillator::OscillatorBias;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accel_decel_parses_positionals_and_flags() {
        let args = AccelDecelArgs::parse(strings(&[
            "in.wav",
            "--min-speed",
            "0.5",
            "out.wav",
            "0.001",
            "1,2",
            "--per-channel-cursor",
            "5,6.5",
        ]))
        .unwrap();
        assert_eq!(args.input, PathBuf::from("in.wav"));
        assert_eq!(args.output, PathBuf::from("out.wav"));
        assert_eq!(args.acceleration, 0.001);
        assert_eq!(args.ranges, strings(&["1,2", "5,6.5"]));
        assert_eq!(args.cursor_update, CursorUpdate::PerChannel);
        assert_eq!(args.min_speed, Some(0.5));
        assert!(args.reversal_guard);

        let config = args.config(100).unwrap();
        assert_eq!(config.ranges.len(), 2);
        assert_eq!(config.ranges[1].stop, 650.0);
        assert_eq!(config.min_speed, Some(0.5));
        assert!(config.reversal_guard);

        let args =
            AccelDecelArgs::parse(strings(&["a", "b", "1", "0,1", "--no-reversal-guard"])).unwrap();
        assert!(!args.config(10).unwrap().reversal_guard);
    }

    #[test]
    fn accel_decel_requires_a_range() {
        let err = AccelDecelArgs::parse(strings(&["in.wav", "out.wav", "0.1"])).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn accel_decel_rejects_bad_values() {
        for args in [
            &["in.wav", "out.wav", "fast", "1,2"][..],
            &["in.wav", "out.wav", "0.1", "1,2", "--min-speed"],
            &["in.wav", "out.wav", "0.1", "1,2", "--bogus"],
        ] {
            assert!(matches!(AccelDecelArgs::parse(strings(args)), Err(Error::Usage(_))));
        }

        let args = AccelDecelArgs::parse(strings(&["a", "b", "-1", "1,2"])).unwrap();
        assert!(matches!(args.config(10), Err(Error::InvalidAcceleration { .. })));
        let args = AccelDecelArgs::parse(strings(&["a", "b", "0.1", "1-2"])).unwrap();
        assert!(matches!(args.config(10), Err(Error::InvalidRange { .. })));
    }

    #[test]
    fn speed_cycle_defaults() {
        let args = SpeedCycleArgs::parse(strings(&["in.wav", "out.wav"])).unwrap();
        assert_eq!(args.config, OscillatorConfig::default());
    }

    #[test]
    fn speed_cycle_flags() {
        let args = SpeedCycleArgs::parse(strings(&[
            "--sample-bound",
            "in.wav",
            "out.wav",
            "--max-speed",
            "5",
        ]))
        .unwrap();
        assert_eq!(args.config.bound, OscillatorBound::InterleavedSamples);
        assert_eq!(args.config.bias, OscillatorBias::SpeedRange { min: 1.0, max: 5.0 });

        let args = SpeedCycleArgs::parse(strings(&["a", "b", "--unit-bias"])).unwrap();
        assert_eq!(args.config.bias, OscillatorBias::Unit);
    }

    #[test]
    fn speed_cycle_rejects_wrong_arity() {
        assert!(matches!(SpeedCycleArgs::parse(strings(&["a"])), Err(Error::Usage(_))));
        assert!(matches!(
            SpeedCycleArgs::parse(strings(&["a", "b", "c"])),
            Err(Error::Usage(_))
        ));
        assert!(matches!(
            SpeedCycleArgs::parse(strings(&["a", "b", "--min-speed", "4"])),
            Err(Error::InvalidSpeedRange { .. })
        ));
    }

    #[test]
    fn usage_errors_exit_with_two() {
        let err = AccelDecelArgs::parse(strings(&["in.wav"])).unwrap_err();
        assert_eq!(exit_status(&err), 2);
        assert_eq!(exit_status(&Error::EmptyRanges), 1);
        assert_eq!(exit_status(&Error::EmptyInput), 1);
    }

    #[test]
    fn usage_names_program() {
        let text = usage("./accel-decel", Tool::AccelDecel);
        assert!(text.starts_with("Usage: ./accel-decel <infile> <outfile> <accel>"));
        assert!(usage("sc", Tool::SpeedCycle).contains("--unit-bias"));
    }
}
