use console::Style;
use magniscope_core::pipeline::config::HarnessConfig;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    path: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

pub fn print_harness_summary(config: &HarnessConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Magniscope Sweep"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    println!(
        "  {:<18}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Output dir"),
        s.path.apply_to(config.output_dir.display())
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("GIF"),
        s.path.apply_to(config.gif_path().display())
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Magnifier"),
        s.path.apply_to(config.magnifier_command.display())
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Lower hertz"),
        s.value.apply_to(format!("{:?}", config.sweep.lower_hertz))
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Upper hertz"),
        s.value.apply_to(format!("{:?}", config.sweep.upper_hertz))
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Amplification"),
        s.value
            .apply_to(format!("{:?}", config.sweep.amplification_factor))
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Pyramid levels"),
        s.value.apply_to(format!("{:?}", config.sweep.pyramid_levels))
    );
    match config.area {
        Some(area) => println!(
            "  {:<18}{}",
            s.label.apply_to("Area"),
            s.value.apply_to(format!(
                "rows {}..{}, cols {}..{}",
                area.first_row, area.last_row, area.first_col, area.last_col
            ))
        ),
        None => println!(
            "  {:<18}{}",
            s.label.apply_to("Area"),
            s.disabled.apply_to("full frame")
        ),
    }
    println!(
        "  {:<18}{}",
        s.label.apply_to("Keep caches"),
        s.value.apply_to(config.keep_cache)
    );
    println!();
}
