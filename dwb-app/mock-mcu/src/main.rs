use clap::Parser;
use core::cell::RefCell;
use dwb_core::mk_static;
use dwb_core::utils::controllers::{BusPins, LED_CHANNEL, LEDCommand, LedModule};
use dwb_core::utils::math::drive::TurnRatio;
use dwb_core::utils::{SystemController, Timer, intake};
use embassy_executor::{Executor, Spawner};
use embedded_hal::i2c::{ErrorType, I2c, Operation};
use smart_leds_trait::{SmartLedsWrite, RGB8};
use static_cell::StaticCell;
use std::convert::Infallible;
use std::path::PathBuf;
use tracing::{error, info};

/// Sequence run when no script is given.
const DEMO: &[&str] = &[
    r#"{"ct":"l","lc":"on"}"#,
    r#"{"ct":"l","lc":"b","n":2,"on":100,"off":50}"#,
    r#"{"ct":"w","wc":"forward","s":120}"#,
    r#"{"ct":"w","wc":"speed","s":200}"#,
    r#"{"ct":"w","wc":"turn_left","s":101}"#,
    r#"{"ct":"w","wc":"rotate_right","s":80}"#,
    r#"{"ct":"w","wc":"address","a":17}"#,
    r#"{"ct":"w","wc":"backward","s":60}"#,
    r#"{"ct":"w","wc":"stop"}"#,
];

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts
{
    /// motor driver I2C address (hex with 0x prefix, or decimal)
    #[clap(long, default_value = "0x10", value_parser = parse_address)]
    address: u8,
    /// SDA line number
    #[clap(long, default_value_t = 6)]
    sda: u8,
    /// SCL line number
    #[clap(long, default_value_t = 5)]
    scl: u8,
    /// inner wheel speed numerator for turns
    #[clap(long, default_value_t = 1)]
    turn_num: u8,
    /// inner wheel speed denominator for turns
    #[clap(long, default_value_t = 2)]
    turn_den: u8,
    /// file with one JSON command per line (built-in demo if omitted)
    #[clap(long)]
    script: Option<PathBuf>,
    /// delay between commands in milliseconds
    #[clap(long, default_value_t = 500)]
    step_ms: u64,
}

fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    match parsed {
        Ok(addr) if addr <= 0x7F => Ok(addr),
        Ok(addr) => Err(format!("0x{addr:02X} is not a 7-bit address")),
        Err(e) => Err(e.to_string()),
    }
}

/// I2C bus that logs every transfer to the console.
struct ConsoleI2c;

impl ErrorType for ConsoleI2c {
    type Error = Infallible;
}

impl I2c for ConsoleI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => info!("I2C 0x{:02X} <- {:02X?}", address, bytes),
                Operation::Read(buf) => buf.fill(0),
            }
        }
        Ok(())
    }
}

/// LED driver that logs to console
struct SerialLedDriver;

impl SmartLedsWrite for SerialLedDriver {
    type Color = RGB8;
    type Error = Infallible;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for c in iterator {
            let c: RGB8 = c.into();
            info!("LED: {:?}", c);
        }
        Ok(())
    }
}

#[embassy_executor::task]
async fn wheel_task(mut ctrl: SystemController<ConsoleI2c>) -> ! {
    ctrl.wheel_ch().await
}

#[embassy_executor::task]
async fn led_task(mut leds: LedModule<SerialLedDriver>) -> ! {
    loop {
        let cmd: LEDCommand = LED_CHANNEL.receiver().receive().await;
        if let Err(e) = leds.ex_command(cmd).await {
            error!("LED command failed: {:?}", e);
        }
    }
}

#[embassy_executor::task]
async fn main_task(spawner: Spawner, opts: Opts) {
    let i2c_bus = mk_static!(RefCell<ConsoleI2c>, RefCell::new(ConsoleI2c));
    let pins = BusPins {
        sda: opts.sda,
        scl: opts.scl,
    };
    let turn_ratio = TurnRatio::new(opts.turn_num, opts.turn_den);

    let sys_ctrl = SystemController::new(i2c_bus, Some(opts.address), Some(pins), Some(turn_ratio));
    spawner.spawn(wheel_task(sys_ctrl)).unwrap();
    spawner.spawn(led_task(LedModule::new(SerialLedDriver))).unwrap();

    let script = match &opts.script {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                error!("cannot read script {}: {}", path.display(), e);
                return;
            }
        },
        None => DEMO.join("\n"),
    };

    for line in script.lines().filter(|l| !l.trim().is_empty()) {
        if let Ok(ack) = intake(line).await {
            info!("{ack}");
        }
        Timer::after_millis(opts.step_ms).await;
    }
    info!("Script finished");
}

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let opts: Opts = Opts::parse();
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(main_task(spawner, opts)).unwrap();
    });
}
