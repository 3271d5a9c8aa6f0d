use argh::FromArgs;

/// Render one view of a built in level to a PNG or PPM image
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// level to render: square, step, pillar, window
    #[argh(option, default = "String::from(\"square\")")]
    pub level: String,
    /// resolution width in pixels
    #[argh(option, default = "0")]
    pub width: u32,
    /// resolution height in pixels
    #[argh(option, default = "0")]
    pub height: u32,
    /// low detail, half the columns drawn two pixels wide
    #[argh(option)]
    pub low_detail: Option<bool>,
    /// pixel aspect correction in percent, 100 is square pixels
    #[argh(option)]
    pub aspect: Option<u32>,
    /// use the finer plane light tables
    #[argh(option)]
    pub smooth_lighting: Option<bool>,
    /// fill the view with a flashing colour before drawing, shows gaps
    #[argh(option)]
    pub flashing_hom: Option<bool>,
    /// look up (negative) or down (positive)
    #[argh(option, default = "0")]
    pub pitch: i32,
    /// frames to render, statistics are logged for each
    #[argh(option, default = "1")]
    pub frames: u32,
    /// path of the image to write
    #[argh(option)]
    pub output: Option<String>,
}
