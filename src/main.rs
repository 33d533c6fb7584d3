#[macro_use]
extern crate clap;
use clap::{App, AppSettings, Arg, ArgGroup, ArgMatches, SubCommand};

use failure::{Error, Fail};

use log::{error, info, warn};
use simplelog;
use std::io;
use std::path::Path;

use chrono::offset::Local;

use parcel_map::api::{HttpParcelApi, MockParcelApi, ParcelApi};
use parcel_map::cli_utils;
use parcel_map::config::AppConfig;
use parcel_map::export;
use parcel_map::map::parcel_map::fit_padding;
use parcel_map::map::{projection, ClickOutcome, FeatureIndex, ParcelMap};
use parcel_map::model::{ParcelFromMap, SurroundingParcel, FIRE_HAZARD_NO, FIRE_HAZARD_YES};
use parcel_map::views::{CategoriesView, NotifierView};

const DEFAULT_WIDTH: &str = "1024";
const DEFAULT_HEIGHT: &str = "768";

#[derive(Debug, Fail)]
pub enum MainError {
    #[fail(display = "{}", _0)]
    RequestFailed(String),
    #[fail(display = "Invalid value for --{}: {}", _0, _1)]
    InvalidArgument(&'static str, String),
}

fn main() {
    let local_time = Local::now();
    let time_offset = local_time.offset();
    // Configure logging
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config {
            offset: time_offset.clone(),
            ..simplelog::Config::default()
        },
        simplelog::TerminalMode::Stderr,
    )
    .ok();

    match do_main() {
        Ok(_) => info!("Process finished OK"),
        Err(err) => {
            error!("Process finished with an error: {}", err);
            std::process::exit(1);
        }
    };
}

fn create_api(config: &AppConfig) -> Result<Box<dyn ParcelApi>, Error> {
    if config.mock {
        info!("Using the in-memory mock API");
        return Ok(Box::new(MockParcelApi::default()));
    }
    info!("Using the parcel API at {}", config.api_base_url);
    Ok(Box::new(HttpParcelApi::new(config)?))
}

fn check_store_error(error_message: &str) -> Result<(), Error> {
    if error_message.is_empty() {
        Ok(())
    } else {
        Err(MainError::RequestFailed(error_message.to_owned()).into())
    }
}

/// Global flags may be given before or after the subcommand name.
fn global_matches<'a>(matches: &'a ArgMatches<'a>, name: &str) -> Option<&'a ArgMatches<'a>> {
    let mut current = matches;
    loop {
        if current.is_present(name) {
            return Some(current);
        }
        match current.subcommand() {
            (_, Some(sub)) => current = sub,
            _ => return None,
        }
    }
}

fn read_map_size(matches: &ArgMatches) -> Result<(u32, u32), Error> {
    let width = value_t!(matches, "width", u32)
        .map_err(|e| MainError::InvalidArgument("width", e.to_string()))?;
    let height = value_t!(matches, "height", u32)
        .map_err(|e| MainError::InvalidArgument("height", e.to_string()))?;
    Ok((width, height))
}

fn geocode_command(api: &dyn ParcelApi, address: &str, quiet: bool) -> Result<(), Error> {
    let mut view = NotifierView::new();
    cli_utils::with_spinner(quiet, "Geocoding...", || view.geocode(api, address));
    check_store_error(&view.address_store().error_message)?;

    if let Some(result) = view.address_store().search_result.as_ref() {
        println!("{}", serde_json::to_string_pretty(result)?);
    }
    Ok(())
}

fn search_command(api: &dyn ParcelApi, query: &str, quiet: bool) -> Result<(), Error> {
    let mut view = NotifierView::new();
    cli_utils::with_spinner(quiet, "Searching...", || view.search_address(api, query));
    check_store_error(&view.address_store().error_message)?;

    println!("{}", serde_json::to_string_pretty(&view.address_store().search_results)?);
    Ok(())
}

fn surrounding_command(
    api: &dyn ParcelApi,
    parcel_id: Option<&str>,
    address: Option<&str>,
    distance: f64,
    output_file: &mut dyn io::Write,
    delimiter: u8,
    quiet: bool,
) -> Result<(), Error> {
    let mut view = NotifierView::new();

    if let Some(id) = parcel_id {
        view.handle_parcel_click(&ParcelFromMap {
            id: id.to_owned(),
            apn: None,
            address: None,
            is_fire_hazard: false,
        });
    }
    if let Some(address) = address {
        cli_utils::with_spinner(quiet, "Geocoding...", || view.geocode(api, address));
        check_store_error(&view.address_store().error_message)?;
    }

    if view.parcel_id().is_none() {
        warn!("No parcel to search around");
        return Ok(());
    }

    cli_utils::with_spinner(quiet, "Searching surrounding parcels...", || {
        view.search_distance(api, distance)
    });
    check_store_error(&view.distance_store().error_message)?;

    let stats = export::write_surrounding_parcels(
        &view.distance_store().search_results,
        output_file,
        delimiter,
    )?;
    info!("Stats: {:?}", stats);
    Ok(())
}

fn fire_hazard_command(
    api: &dyn ParcelApi,
    parcel_id: &str,
    new_status: Option<&str>,
    quiet: bool,
) -> Result<(), Error> {
    let parcel = ParcelFromMap {
        id: parcel_id.to_owned(),
        apn: None,
        address: None,
        is_fire_hazard: false,
    };
    let mut view = CategoriesView::new();

    cli_utils::with_spinner(quiet, "Loading fire hazard status...", || view.select(api, &parcel));
    if let Some(status) = new_status {
        cli_utils::with_spinner(quiet, "Saving fire hazard status...", || view.save(api, status));
    }

    if let Some(store) = view.fire_hazard_store() {
        check_store_error(&store.error_message)?;
        println!("{}\t{}", store.parcel_id(), store.is_fire_hazard_str);
    }
    Ok(())
}

fn click_command<P: AsRef<Path>>(
    config: &AppConfig,
    parcels_path: P,
    size: (u32, u32),
    pixel: (f64, f64),
) -> Result<(), Error> {
    info!("Loading parcels from {:?} ...", parcels_path.as_ref());
    let index = FeatureIndex::from_geojson_file(parcels_path)?;
    let extent = index.extent();
    info!("{} features loaded", index.len());

    let mut map = ParcelMap::from_config(config, size.0, size.1, index)?;
    if let Some(extent) = extent {
        let padding = fit_padding(map.view());
        map.view_mut().fit(&extent, padding)?;
    }
    if !map.data_layer().is_visible_at(map.view().zoom()) {
        warn!("Parcels are hidden at zoom {:.2}", map.view().zoom());
    }

    match map.handle_click(pixel.0, pixel.1) {
        ClickOutcome::Selected(parcel) => {
            println!("{}", serde_json::to_string_pretty(&parcel)?);
            println!("{}", map.popup().content());
        }
        ClickOutcome::Deselected => println!("No parcel at ({}, {})", pixel.0, pixel.1),
    }

    let highlighted = map.highlight().get().map(str::to_owned);
    for rendered in map.render() {
        if highlighted.is_some() && rendered.id == highlighted {
            info!("Parcel {:?} drawn with {:?} style", rendered.id, rendered.kind);
        }
    }
    Ok(())
}

fn select_command<P: AsRef<Path>>(
    config: &AppConfig,
    records_path: P,
    size: (u32, u32),
) -> Result<(), Error> {
    let records_file = std::fs::File::open(records_path)?;
    let records: Vec<SurroundingParcel> = serde_json::from_reader(io::BufReader::new(records_file))?;

    let mut map = ParcelMap::from_config(config, size.0, size.1, FeatureIndex::empty())?;
    let selected = map.select_parcels(&records)?;

    let (x, y) = map.view().center();
    let (lon, lat) = projection::to_lon_lat(x, y);
    println!("selected\t{}", selected);
    println!("center\t{:.6}\t{:.6}", lon, lat);
    println!("zoom\t{:.2}", map.view().zoom());
    for url in map.tile_urls() {
        println!("tile\t{}", url);
    }
    Ok(())
}

fn style_command(api: &dyn ParcelApi, quiet: bool) -> Result<(), Error> {
    let style = cli_utils::with_spinner(quiet, "Fetching map style...", || api.map_style())?;

    let layers = style["layers"].as_array().map(Vec::as_slice).unwrap_or_default();
    info!("Style has {} layers", layers.len());
    for layer in layers {
        println!(
            "{}\t{}",
            layer["id"].as_str().unwrap_or_default(),
            layer["type"].as_str().unwrap_or_default()
        );
    }
    Ok(())
}

fn size_args<'a, 'b>(command: App<'a, 'b>) -> App<'a, 'b> {
    command
        .arg(Arg::with_name("width")
            .long("width")
            .help("Map width in pixels")
            .takes_value(true)
            .default_value(DEFAULT_WIDTH)
        )
        .arg(Arg::with_name("height")
            .long("height")
            .help("Map height in pixels")
            .takes_value(true)
            .default_value(DEFAULT_HEIGHT)
        )
}

fn do_main() -> Result<(), Error> {
    let matches = App::new("parcel-map")
                    .version(crate_version!())
                    .about("Search parcels, select them on a map and flag fire hazards")
                    .setting(AppSettings::SubcommandRequiredElseHelp)
                    .arg(Arg::with_name("api-url")
                        .long("api-url")
                        .help("Base URL of the parcel API")
                        .takes_value(true)
                        .global(true)
                    )
                    .arg(Arg::with_name("mock")
                        .long("mock")
                        .help("Use the in-memory mock API")
                        .global(true)
                    )
                    .arg(Arg::with_name("quiet")
                        .short("q")
                        .long("quiet")
                        .help("Hide progress spinners")
                        .global(true)
                    )
                    .subcommand(
                        SubCommand::with_name("geocode")
                            .about("Find the parcel at an address")
                            .arg(Arg::with_name("address")
                                .required(true)
                                .help("Street address")
                            )
                    )
                    .subcommand(
                        SubCommand::with_name("search")
                            .about("Search parcels by address")
                            .arg(Arg::with_name("query")
                                .required(true)
                                .help("Search text")
                            )
                    )
                    .subcommand(
                        SubCommand::with_name("surrounding")
                            .about("List the parcels within a distance of a parcel as CSV")
                            .group(ArgGroup::with_name("origin")
                                .args(&["parcel", "address"])
                                .required(true))
                            .arg(Arg::with_name("parcel")
                                .short("p")
                                .long("parcel")
                                .help("Parcel id to search around")
                                .takes_value(true)
                            )
                            .arg(Arg::with_name("address")
                                .short("a")
                                .long("address")
                                .help("Geocode this address and search around its parcel")
                                .takes_value(true)
                            )
                            .arg(Arg::with_name("distance")
                                .long("distance")
                                .help("Search distance")
                                .takes_value(true)
                                .required(true)
                            )
                            .arg(Arg::with_name("output")
                                .short("o")
                                .long("output")
                                .help("Sets the output file to create. If omitted, stdout will be used.")
                                .takes_value(true)
                            )
                            .arg(Arg::with_name("delimiter")
                                .short("d")
                                .long("delimiter")
                                .help("Delimiter for output fields")
                                .takes_value(true)
                                .default_value(","),
                            )
                    )
                    .subcommand(
                        SubCommand::with_name("firehazard")
                            .about("Read or set the fire hazard status of a parcel")
                            .setting(AppSettings::SubcommandRequiredElseHelp)
                            .subcommand(
                                SubCommand::with_name("get")
                                    .arg(Arg::with_name("parcel").required(true))
                            )
                            .subcommand(
                                SubCommand::with_name("set")
                                    .arg(Arg::with_name("parcel").required(true))
                                    .arg(Arg::with_name("status")
                                        .required(true)
                                        .possible_values(&[FIRE_HAZARD_YES, FIRE_HAZARD_NO])
                                    )
                            )
                    )
                    .subcommand(size_args(
                        SubCommand::with_name("click")
                            .about("Click a pixel of a map showing a parcel GeoJSON file")
                            .arg(Arg::with_name("parcels")
                                .short("g")
                                .long("parcels")
                                .help("Path for the parcels geo-json file")
                                .takes_value(true)
                                .required(true)
                            )
                            .arg(Arg::with_name("x")
                                .short("x")
                                .help("Pixel column")
                                .takes_value(true)
                                .required(true)
                            )
                            .arg(Arg::with_name("y")
                                .short("y")
                                .help("Pixel row")
                                .takes_value(true)
                                .required(true)
                            )
                    ))
                    .subcommand(size_args(
                        SubCommand::with_name("select")
                            .about("Overlay surrounding-parcel records and fit the map to them")
                            .arg(Arg::with_name("records")
                                .short("r")
                                .long("records")
                                .help("JSON file with surrounding parcel records")
                                .takes_value(true)
                                .required(true)
                            )
                    ))
                    .subcommand(
                        SubCommand::with_name("style")
                            .about("Fetch the base map style and list its layers")
                    )
                    .get_matches();

    let mut config = AppConfig::default().with_mock(global_matches(&matches, "mock").is_some());
    if let Some(url) = global_matches(&matches, "api-url").and_then(|m| m.value_of("api-url")) {
        config = config.with_api_url(url);
    }
    let quiet = global_matches(&matches, "quiet").is_some();

    match matches.subcommand() {
        ("geocode", Some(m)) => {
            let api = create_api(&config)?;
            geocode_command(api.as_ref(), m.value_of("address").unwrap_or_default(), quiet)
        }
        ("search", Some(m)) => {
            let api = create_api(&config)?;
            search_command(api.as_ref(), m.value_of("query").unwrap_or_default(), quiet)
        }
        ("surrounding", Some(m)) => {
            let api = create_api(&config)?;
            let distance = value_t!(m, "distance", f64)
                .map_err(|e| MainError::InvalidArgument("distance", e.to_string()))?;

            // Should be exactly one character.
            let delimiter = m.value_of("delimiter").unwrap_or_default().replace("\\t", "\t");
            let char_delimiter = *delimiter
                .as_bytes()
                .first()
                .ok_or_else(|| MainError::InvalidArgument("delimiter", delimiter.clone()))?;

            let stdout = io::stdout();
            let mut output_file: Box<dyn io::Write> = match m.value_of("output") {
                Some(path) => {
                    info!("Writing to file {}.", path);
                    Box::new(std::fs::File::create(path)?)
                }
                None => Box::new(stdout.lock()),
            };

            surrounding_command(
                api.as_ref(),
                m.value_of("parcel"),
                m.value_of("address"),
                distance,
                output_file.as_mut(),
                char_delimiter,
                quiet,
            )
        }
        ("firehazard", Some(m)) => {
            let api = create_api(&config)?;
            match m.subcommand() {
                ("get", Some(get)) => fire_hazard_command(
                    api.as_ref(),
                    get.value_of("parcel").unwrap_or_default(),
                    None,
                    quiet,
                ),
                ("set", Some(set)) => fire_hazard_command(
                    api.as_ref(),
                    set.value_of("parcel").unwrap_or_default(),
                    set.value_of("status"),
                    quiet,
                ),
                _ => Ok(()),
            }
        }
        ("click", Some(m)) => {
            let x = value_t!(m, "x", f64).map_err(|e| MainError::InvalidArgument("x", e.to_string()))?;
            let y = value_t!(m, "y", f64).map_err(|e| MainError::InvalidArgument("y", e.to_string()))?;
            click_command(
                &config,
                Path::new(m.value_of("parcels").unwrap_or_default()),
                read_map_size(m)?,
                (x, y),
            )
        }
        ("select", Some(m)) => select_command(
            &config,
            Path::new(m.value_of("records").unwrap_or_default()),
            read_map_size(m)?,
        ),
        ("style", Some(_)) => {
            let api = create_api(&config)?;
            style_command(api.as_ref(), quiet)
        }
        _ => Ok(()),
    }
}
