use city_ngin::{
    CityManifest, LayoutConfig,
    city::run,
    layout::{AssetVariant, RoadKind},
};

fn glyph(variant: AssetVariant) -> char {
    match variant {
        AssetVariant::Road(RoadKind::Corner) => '+',
        AssetVariant::Road(RoadKind::TJunction) => 'T',
        AssetVariant::Road(RoadKind::Crossing) => 'X',
        AssetVariant::Road(RoadKind::Straight) => '#',
        AssetVariant::Building(idx) => char::from_digit((idx % 10) as u32, 10).unwrap_or('B'),
    }
}

/// Usage: city [world_length] [road_probability] [seed]
fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let defaults = LayoutConfig::default();
    let config = LayoutConfig {
        world_length: args.next().map(|a| a.parse()).transpose()?.unwrap_or(12),
        road_probability: args
            .next()
            .map(|a| a.parse())
            .transpose()?
            .unwrap_or(defaults.road_probability),
        seed: args.next().map(|a| a.parse()).transpose()?.unwrap_or(defaults.seed),
        ..defaults
    };

    let city = run(&CityManifest::default(), &config)?;
    let layout = &city.layout;
    for row in layout.placements.chunks(layout.world_length) {
        let line = row.iter().map(|p| glyph(p.asset_variant)).collect::<String>();
        println!("{line}");
    }
    log::info!(
        "{} assets drawn through {} instanced batches, camera target {:?}",
        layout.placements.len(),
        layout.instances_by_asset().len(),
        layout.center()
    );
    Ok(())
}
