use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll, Waker};

use dwb_core::utils::connection::intake::{self, CommandError};
use dwb_core::utils::controllers::frame::{encode, Drive, WheelSide};
use dwb_core::utils::controllers::leds::state_color;
use dwb_core::utils::controllers::{
    LEDCommand, LedModule, MotionState, SystemCommand, WheelCommand, LED_CHANNEL, WHEEL_CHANNEL,
};
use dwb_core::utils::math::drive::{wheel_drives, TurnRatio};
use smart_leds_trait::{SmartLedsWrite, RGB8};

/// Poll a future once; everything tested here completes without waiting.
fn poll_once<F: Future>(fut: F) -> Poll<F::Output> {
    let mut fut = pin!(fut);
    fut.as_mut().poll(&mut Context::from_waker(Waker::noop()))
}

/// Drive a future to completion, letting the std time driver advance timers.
fn block_on<F: Future>(fut: F) -> F::Output {
    let mut fut = pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}

/// LED driver that records every frame written to it.
#[derive(Default)]
struct RecordingLeds {
    frames: Vec<Vec<RGB8>>,
}

impl SmartLedsWrite for RecordingLeds {
    type Error = ();
    type Color = RGB8;

    fn write<T, I>(
        &mut self,
        iterator: T,
    ) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.frames.push(iterator.into_iter().map(Into::into).collect());
        Ok(())
    }
}

#[test]
fn frame_encoding_is_exact() {
    assert_eq!(encode(WheelSide::Left, Drive::forward(7)), [0x00, 0x00, 7]);
    assert_eq!(encode(WheelSide::Right, Drive::forward(7)), [0x02, 0x00, 7]);
    assert_eq!(encode(WheelSide::Left, Drive::backward(200)), [0x00, 0x01, 200]);
    assert_eq!(encode(WheelSide::Right, Drive::backward(0)), [0x02, 0x01, 0]);
    assert_eq!(encode(WheelSide::Left, Drive::Stop), [0x00, 0x02, 0]);
    assert_eq!(encode(WheelSide::Right, Drive::Stop), [0x02, 0x02, 0]);
}

#[test]
fn drive_mapping_covers_every_state() {
    let r = TurnRatio::HALF;
    assert_eq!(wheel_drives(MotionState::Stopped, 90, r), (Drive::Stop, Drive::Stop));
    assert_eq!(
        wheel_drives(MotionState::Forward, 90, r),
        (Drive::forward(90), Drive::forward(90))
    );
    assert_eq!(
        wheel_drives(MotionState::Backward, 90, r),
        (Drive::backward(90), Drive::backward(90))
    );
    assert_eq!(
        wheel_drives(MotionState::TurnLeft, 255, r),
        (Drive::forward(127), Drive::forward(255))
    );
    assert_eq!(
        wheel_drives(MotionState::TurnRight, 1, r),
        (Drive::forward(1), Drive::forward(0))
    );
    assert_eq!(
        wheel_drives(MotionState::RotateLeft, 90, r),
        (Drive::backward(90), Drive::forward(90))
    );
    assert_eq!(
        wheel_drives(MotionState::RotateRight, 90, r),
        (Drive::forward(90), Drive::backward(90))
    );
}

#[test]
fn turn_ratio_is_clamped() {
    assert_eq!(TurnRatio::new(5, 0), TurnRatio { num: 1, den: 1 });
    assert_eq!(TurnRatio::new(9, 4), TurnRatio { num: 4, den: 4 });
    assert_eq!(TurnRatio::new(0, 3).inner(255), 0);
    assert_eq!(TurnRatio::new(2, 3).inner(100), 66);
}

#[test]
fn parse_wheel_and_led_commands() {
    let cmd = intake::parse_line(r#"{"ct":"w","wc":"turn_left","s":120}"#).unwrap();
    assert_eq!(cmd, Some(SystemCommand::W(WheelCommand::TurnLeft { s: 120 })));

    let cmd = intake::parse_line(r#" {"ct":"w","wc":"stop"} "#).unwrap();
    assert_eq!(cmd, Some(SystemCommand::W(WheelCommand::Stop)));

    let cmd = intake::parse_line(r#"{"ct":"w","wc":"set","st":"rotate_right","s":33}"#).unwrap();
    assert_eq!(
        cmd,
        Some(SystemCommand::W(WheelCommand::Set {
            st: MotionState::RotateRight,
            s: 33
        }))
    );

    let cmd = intake::parse_line(r#"{"ct":"l","lc":"sc","r":1,"g":2,"b":3}"#).unwrap();
    assert_eq!(cmd, Some(SystemCommand::L(LEDCommand::SC { r: 1, g: 2, b: 3 })));
}

#[test]
fn parse_skips_blank_and_comment_lines() {
    assert_eq!(intake::parse_line("").unwrap(), None);
    assert_eq!(intake::parse_line("   ").unwrap(), None);
    assert_eq!(intake::parse_line("# warm up").unwrap(), None);
}

#[test]
fn parse_rejects_bad_commands() {
    assert!(matches!(
        intake::parse_line(r#"{"ct":"w","wc":"forward","s":256}"#),
        Err(CommandError::Json(_))
    ));
    assert!(matches!(
        intake::parse_line(r#"{"ct":"w","wc":"hover"}"#),
        Err(CommandError::Json(_))
    ));
    assert!(intake::parse_line("forward 10").is_err());
}

#[test]
fn forward_pushes_wheel_commands() {
    let ack = poll_once(intake::forward(r#"{"ct":"w","wc":"address","a":17}"#));
    assert!(matches!(ack, Poll::Ready(Ok(_))));
    assert_eq!(WHEEL_CHANNEL.try_receive().ok(), Some(WheelCommand::Address { a: 17 }));
}

#[test]
fn forward_pushes_led_commands() {
    let ack = poll_once(intake::forward(r#"{"ct":"l","lc":"on"}"#));
    assert!(matches!(ack, Poll::Ready(Ok(_))));
    assert_eq!(LED_CHANNEL.try_receive().ok(), Some(LEDCommand::On));
}

#[test]
fn leds_follow_on_off_and_color() {
    let mut leds = LedModule::new(RecordingLeds::default());

    // color set while off is remembered, not shown
    let _ = poll_once(leds.ex_command(LEDCommand::SC { r: 9, g: 8, b: 7 }));
    assert!(leds.driver().frames.is_empty());

    let _ = poll_once(leds.ex_command(LEDCommand::On));
    assert!(leds.is_on());
    assert_eq!(leds.driver().frames.last(), Some(&vec![RGB8 { r: 9, g: 8, b: 7 }; 2]));

    let _ = poll_once(leds.ex_command(LEDCommand::Off));
    assert!(!leds.is_on());
    assert_eq!(leds.driver().frames.last(), Some(&vec![RGB8 { r: 0, g: 0, b: 0 }; 2]));
}

#[test]
fn leds_show_motion_state() {
    let mut leds = LedModule::new(RecordingLeds::default());
    let _ = poll_once(leds.ex_command(LEDCommand::On));
    let _ = poll_once(leds.ex_command(LEDCommand::St {
        st: MotionState::RotateLeft,
    }));

    let color = state_color(MotionState::RotateLeft);
    assert_eq!(leds.last_color(), Some(color));
    assert_eq!(leds.driver().frames.last(), Some(&vec![color; 2]));
    assert_ne!(state_color(MotionState::Stopped), state_color(MotionState::Forward));
}

#[test]
fn motion_state_labels() {
    assert_eq!(MotionState::default(), MotionState::Stopped);
    assert_eq!(MotionState::TurnLeft.to_string(), "TURN L");
    assert_eq!(MotionState::RotateRight.label(), "ROT R");
}

#[test]
fn leds_blink_pattern_restores_color_while_on() {
    let color = RGB8 { r: 4, g: 5, b: 6 };
    let black = RGB8 { r: 0, g: 0, b: 0 };
    let mut leds = LedModule::new(RecordingLeds::default());
    block_on(leds.ex_command(LEDCommand::SC { r: 4, g: 5, b: 6 })).unwrap();
    block_on(leds.ex_command(LEDCommand::On)).unwrap();
    let start = leds.driver().frames.len();

    block_on(leds.ex_command(LEDCommand::B { n: 2, on: 2, off: 1 })).unwrap();

    let frames: Vec<RGB8> = leds.driver().frames[start..].iter().map(|f| f[0]).collect();
    assert_eq!(frames, vec![color, black, color, black, color]);
    assert!(leds.driver().frames[start..].iter().all(|f| f.len() == 2));
    assert!(leds.is_on());
}

#[test]
fn leds_blink_pattern_ends_dark_while_off() {
    let black = RGB8 { r: 0, g: 0, b: 0 };
    let white = RGB8 {
        r: 255,
        g: 255,
        b: 255,
    };
    let mut leds = LedModule::new(RecordingLeds::default());

    block_on(leds.ex_command(LEDCommand::B { n: 2, on: 1, off: 1 })).unwrap();

    let frames: Vec<RGB8> = leds.driver().frames.iter().map(|f| f[0]).collect();
    assert_eq!(frames, vec![white, black, white, black]);
    assert!(!leds.is_on());
}

#[test]
fn leds_blink_zero_times() {
    let mut off = LedModule::new(RecordingLeds::default());
    block_on(off.ex_command(LEDCommand::B { n: 0, on: 1, off: 1 })).unwrap();
    assert!(off.driver().frames.is_empty());

    let mut on = LedModule::new(RecordingLeds::default());
    block_on(on.ex_command(LEDCommand::SC { r: 7, g: 7, b: 7 })).unwrap();
    block_on(on.ex_command(LEDCommand::On)).unwrap();
    let start = on.driver().frames.len();
    block_on(on.ex_command(LEDCommand::B { n: 0, on: 1, off: 1 })).unwrap();
    assert_eq!(on.driver().frames.len(), start + 1);
    assert_eq!(on.driver().frames.last(), Some(&vec![RGB8 { r: 7, g: 7, b: 7 }; 2]));
}
