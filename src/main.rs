use log::{error, info};
use pitches::{
    config::AppConfig,
    data::PitchCatalog,
    error::{PitchError, Result},
    pitch::PitchType,
    render::{LogSink, SceneAdapter},
    simulation::adjust_simulation_speed,
    trajectory::arrival_time,
    world_gen::{generate_catalog, GenerationConfig},
    AnimationController,
};
use std::time::{Duration, Instant};

const FRAME_TIME_CAP: Duration = Duration::from_millis(16);

#[derive(Default)]
struct Options {
    config: Option<String>,
    data: Option<String>,
    team: Option<String>,
    pitcher: Option<String>,
    types: Option<Vec<String>>,
    seconds: f64,
    speed: f64,
}

fn parse_options<I>(args: I) -> Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options {
        seconds: 5.,
        speed: 1.,
        ..Options::default()
    };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| PitchError::InvalidArgument(format!("missing value for {}", arg)))
        };
        match arg.as_str() {
            "--config" => options.config = Some(value()?),
            "--data" => options.data = Some(value()?),
            "--team" => options.team = Some(value()?),
            "--pitcher" => options.pitcher = Some(value()?),
            "--types" => {
                options.types = Some(value()?.split(',').map(|t| t.trim().to_string()).collect())
            }
            "--seconds" => options.seconds = parse_positive("--seconds", &value()?)?,
            "--speed" => options.speed = parse_positive("--speed", &value()?)?,
            other => {
                return Err(PitchError::InvalidArgument(format!(
                    "unknown argument {}",
                    other
                )));
            }
        }
    }
    Ok(options)
}

/// A finite number greater than zero. Anything else would stall the frame loop.
fn parse_positive(name: &str, text: &str) -> Result<f64> {
    match text.parse::<f64>() {
        Ok(number) if number.is_finite() && number > 0. => Ok(number),
        _ => Err(PitchError::InvalidArgument(format!(
            "{} expects a positive number, got {}",
            name, text
        ))),
    }
}

fn type_list(types: &[PitchType]) -> String {
    let codes: Vec<&str> = types.iter().map(|pitch_type| pitch_type.code()).collect();
    codes.join(", ")
}

fn run(options: Options) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    adjust_simulation_speed(&mut config.simulation, options.speed);
    let time_delta = config.simulation.time_delta;
    if !time_delta.is_finite() || time_delta <= 0. {
        return Err(PitchError::InvalidArgument(format!(
            "time step {} must be a positive number",
            time_delta
        )));
    }

    let catalog = match &options.data {
        Some(path) => PitchCatalog::load(path, &config.ingest)?,
        None => {
            info!("No data file given, using generated pitches");
            generate_catalog(&GenerationConfig::default(), &config.ingest)
        }
    };
    if catalog.is_empty() {
        return Err(PitchError::DataLoad("no data available".to_string()));
    }

    let mut controller = AnimationController::new(config.simulation);
    let team = match &options.team {
        Some(team) => team.clone(),
        None => catalog
            .teams()
            .into_iter()
            .next()
            .ok_or_else(|| PitchError::DataLoad("no teams in data".to_string()))?,
    };
    let (pitcher, types) = match &options.pitcher {
        Some(pitcher) => {
            let types = controller.select_group(&catalog, &team, pitcher)?;
            (pitcher.clone(), types)
        }
        None => controller.select_team(&catalog, &team)?,
    };

    let enabled: Vec<PitchType> = match &options.types {
        Some(codes) => codes.iter().map(|code| PitchType::from(code.as_str())).collect(),
        None => types.clone(),
    };
    for pitch_type in &enabled {
        controller.set_active(pitch_type, true);
    }
    for trajectory in catalog.trajectories(&team, &pitcher).unwrap_or(&[]) {
        if let Some(t) = arrival_time(trajectory, config.simulation.plate_distance) {
            info!("{} reaches the plate after {:.3}s", trajectory.pitch_type(), t);
        }
    }
    info!(
        "Animating {} / {}: {}",
        team,
        pitcher,
        type_list(&controller.active_types())
    );

    let mut adapter = SceneAdapter::new(config.scene);
    let mut sink = LogSink::default();
    let mut last_report = 0.;
    while controller.time() < options.seconds {
        let frame_start = Instant::now();
        controller.tick(time_delta)?;
        controller.publish(&mut adapter, &mut sink);
        for failure in controller.take_failures() {
            error!("{} ball {:?} stopped: {}", failure.pitch_type, failure.id, failure.reason);
        }

        if controller.time() - last_report >= 1. {
            last_report = controller.time();
            let loops: u64 = controller.instances().iter().map(|ball| ball.loops).sum();
            info!(
                "t={:.2}s frames={} visible={} plate crossings={}",
                controller.time(),
                sink.frames,
                controller.visible_ids().len(),
                loops
            );
        }
        if let Some(remaining) = FRAME_TIME_CAP.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }
    Ok(())
}

pub fn main() {
    if let Err(err) = pitches::logging::init() {
        eprintln!("{}", err);
    }
    let result = parse_options(std::env::args().skip(1)).and_then(run);
    if let Err(err) = result {
        error!("{}", err);
        std::process::exit(1);
    }
}
