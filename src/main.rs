use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use work_viability::config::{ServeArgs, init_tracing};
use work_viability::core::{
    ChildSpec, ChildcareRequest, CommuteRequest, DataError, DataSet, DrivingOption,
    NATIONAL_REGION, TransitOption, WorkSchedule, compare, run_childcare,
};
use work_viability::{api, report};

const CLI_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(
    name = "work-viability",
    version,
    about = "Does going to work pay once childcare and commuting are counted?"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Net income after childcare, credit and pre-tax account.
    Childcare(ChildcareArgs),
    /// Driving versus transit for the same job.
    Commute(CommuteArgs),
    /// Versions of the bundled cost tables and benefit programs.
    Tables {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ScheduleArgs {
    #[arg(long, default_value_t = 15.0)]
    wage: f64,

    #[arg(long, default_value_t = 40.0)]
    hours: f64,

    #[arg(long, default_value_t = 5)]
    days: u32,

    /// Route eligible costs through the pre-tax account.
    #[arg(long)]
    pre_tax: bool,

    /// Workday counts to project, e.g. `5,4,3,2`.
    #[arg(long, value_delimiter = ',')]
    sweep: Option<Vec<u32>>,

    #[arg(long)]
    json: bool,
}

impl ScheduleArgs {
    fn schedule(&self) -> WorkSchedule {
        WorkSchedule::new(self.wage, self.hours, self.days)
    }
}

#[derive(Args, Debug)]
struct ChildcareArgs {
    #[arg(long, default_value = NATIONAL_REGION)]
    region: String,

    /// `age-band:care-setting`, repeat once per child.
    #[arg(long = "child", value_parser = parse_child)]
    children: Vec<ChildSpec>,

    #[command(flatten)]
    schedule: ScheduleArgs,
}

#[derive(Args, Debug)]
struct CommuteArgs {
    #[arg(long, default_value = NATIONAL_REGION)]
    region: String,

    #[arg(long, default_value = "medium_sedan")]
    vehicle: String,

    /// Round-trip miles per workday.
    #[arg(long, default_value_t = 0.0)]
    miles: f64,

    #[arg(long, default_value_t = 0.0)]
    parking: f64,

    #[arg(long, default_value_t = 0.0)]
    tolls: f64,

    /// Round-trip driving minutes per workday.
    #[arg(long, default_value_t = 0.0)]
    drive_minutes: f64,

    #[arg(long, default_value_t = 0.0)]
    transit_minutes: f64,

    /// Monthly pass price; defaults to the regional table.
    #[arg(long)]
    transit_pass: Option<f64>,

    #[command(flatten)]
    schedule: ScheduleArgs,
}

fn parse_child(raw: &str) -> Result<ChildSpec, String> {
    let (age_band, care_setting) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected age-band:care-setting, got '{raw}'"))?;
    if age_band.trim().is_empty() || care_setting.trim().is_empty() {
        return Err(format!("expected age-band:care-setting, got '{raw}'"));
    }
    Ok(ChildSpec {
        age_band: age_band.trim().to_string(),
        care_setting: care_setting.trim().to_string(),
    })
}

fn print_output<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) {
    if json {
        match serde_json::to_string_pretty(value) {
            Ok(body) => println!("{body}"),
            Err(e) => fail(&format!("could not serialize output: {e}")),
        }
    } else {
        println!("{}", text(value));
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("error: {msg}");
    std::process::exit(1);
}

fn load_data() -> DataSet {
    match DataSet::bundled() {
        Ok(data) => {
            for version in data.versions() {
                info!(
                    table = %version.name,
                    last_updated = %version.last_updated,
                    rows = version.rows,
                    "loaded table"
                );
            }
            data
        }
        Err(e) => fail(&format!("bundled data is invalid: {e}")),
    }
}

fn cli_data() -> DataSet {
    init_tracing(CLI_LOG_LEVEL);
    load_data()
}

fn childcare_command(args: ChildcareArgs) -> Result<(), DataError> {
    let data = cli_data();
    let request = ChildcareRequest {
        region: args.region,
        children: args.children,
        schedule: args.schedule.schedule(),
        use_pre_tax_account: args.schedule.pre_tax,
        sweep: args.schedule.sweep,
    };
    let outcome = run_childcare(&data, &request)?;
    print_output(args.schedule.json, &outcome, report::render_childcare);
    Ok(())
}

fn commute_command(args: CommuteArgs) -> Result<(), DataError> {
    let data = cli_data();
    let request = CommuteRequest {
        region: args.region,
        schedule: args.schedule.schedule(),
        driving: DrivingOption {
            vehicle_class: args.vehicle,
            round_trip_miles: args.miles,
            daily_parking: args.parking,
            daily_tolls: args.tolls,
            round_trip_minutes: args.drive_minutes,
        },
        transit: TransitOption {
            monthly_pass: args.transit_pass,
            round_trip_minutes: args.transit_minutes,
        },
        use_pre_tax_account: args.schedule.pre_tax,
        sweep: args.schedule.sweep,
    };
    let comparison = compare(&data, &request)?;
    print_output(args.schedule.json, &comparison, report::render_commute);
    Ok(())
}

async fn serve_command(args: ServeArgs) -> std::io::Result<()> {
    init_tracing(&args.log_level);
    let data = load_data();
    api::run_http_server(args.socket_addr(), data).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Serve(args) => serve_command(args)
            .await
            .map_err(|e| format!("server error: {e}")),
        Command::Childcare(args) => childcare_command(args).map_err(|e| e.to_string()),
        Command::Commute(args) => commute_command(args).map_err(|e| e.to_string()),
        Command::Tables { json } => {
            let versions = cli_data().versions();
            print_output(json, &versions, |v| report::render_tables(v));
            Ok(())
        }
    };

    if let Err(msg) = outcome {
        fail(&msg);
    }
}
