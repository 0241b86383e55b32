use crate::app::{args::PresetsOptions, cli::ansi, Config};
use base::error::MetaliorError;

/// Prints the preset table.
pub fn list(opts: PresetsOptions, config: Config) -> Result<(), MetaliorError> {
    let table = config.load_presets(opts.presets.as_deref())?;
    println!(
        "  {} {} presets (n and k at {:?} µm)",
        ansi::YELLOW_GT,
        table.len(),
        base::optics::ior::RGB_WAVELENGTHS_UM
    );
    for preset in table.iter() {
        let (n, k) = (preset.ior.eta, preset.ior.k);
        println!(
            "    {} {:<10} n = [{:.5}, {:.5}, {:.5}], k = [{:.5}, {:.5}, {:.5}]",
            ansi::CYAN_MINUS,
            preset.name,
            n.x,
            n.y,
            n.z,
            k.x,
            k.y,
            k.z
        );
    }
    Ok(())
}
