use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30, 1).unwrap(),
        audio: None,
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(validate_config(&cfg(0, 10)).is_err());
    assert!(validate_config(&cfg(11, 10)).is_err());
    assert!(validate_config(&cfg(10, 10)).is_ok());

    let mut with_audio = cfg(10, 10);
    with_audio.audio = Some(AudioInputConfig {
        path: PathBuf::from("target/definitely_missing_song.mp3"),
        duration_secs: 2.0,
    });
    assert!(validate_config(&with_audio).is_err());

    with_audio.audio = Some(AudioInputConfig {
        path: PathBuf::from("Cargo.toml"),
        duration_secs: 0.0,
    });
    assert!(validate_config(&with_audio).is_err());
}

#[test]
fn args_without_audio_disable_audio_stream() {
    let args = ffmpeg_args(&cfg(64, 48), Path::new("out/x.mp4"), true);
    assert_eq!(args[0], "-y");
    assert!(args.windows(2).any(|w| w[0] == "-pix_fmt" && w[1] == "rgb24"));
    assert!(args.windows(2).any(|w| w[0] == "-s" && w[1] == "64x48"));
    assert!(args.windows(2).any(|w| w[0] == "-r" && w[1] == "30/1"));
    assert!(args.iter().any(|a| a == "-an"));
    assert_eq!(args.last().map(String::as_str), Some("out/x.mp4"));
}

#[test]
fn args_with_audio_trim_before_input() {
    let mut c = cfg(64, 48);
    c.audio = Some(AudioInputConfig {
        path: PathBuf::from("song.mp3"),
        duration_secs: 10.0,
    });
    let args = ffmpeg_args(&c, Path::new("x.mp4"), false);
    assert_eq!(args[0], "-n");
    let t = args.iter().position(|a| a == "-t").unwrap();
    assert_eq!(args[t + 1], "10.000");
    assert_eq!(args[t + 2], "-i");
    assert_eq!(args[t + 3], "song.mp3");
    assert!(args.iter().any(|a| a == "aac"));
    assert!(!args.iter().any(|a| a == "-an"));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/never.mp4"));
    let frame = Frame {
        width: 2,
        height: 2,
        data: vec![0; 12],
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}
