use clap::{Parser, Subcommand};
use countermeasure_maps::{Palette, Projection};

/// Maps of the COVID-19 countermeasures taken by governments.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the data sources and output settings.
    /// The options passed on the command line take precedence over the content of this file.
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<String>,

    /// (URL or file path) The countermeasures dataset in CSV format. Defaults to the dataset maintained
    /// by Olivier Lejeune on GitHub.
    #[clap(short, long, value_parser, global = true)]
    pub data: Option<String>,

    /// (URL or file path) A CSV table of ISO 3166 country codes, used to report the countries
    /// that cannot be placed on the map.
    #[clap(long, value_parser, global = true)]
    pub iso_codes: Option<String>,

    /// If passed as an argument, the ISO 3166 table is not loaded.
    #[clap(long, takes_value = false, global = true)]
    pub skip_iso_codes: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Builds the map for one day.
    Render {
        /// (YYYY-MM-DD, optional) The day to show. Defaults to today, or to the latest day of the data.
        #[clap(long, value_parser)]
        date: Option<String>,
        /// (default Shikari) One of Viridis, Cividis, Plotly3, Magma, Plasma, Shikari.
        #[clap(short, long, value_parser)]
        palette: Option<Palette>,
        /// (default 'natural earth') The projection of the world map.
        #[clap(long, value_parser)]
        projection: Option<Projection>,
        /// (file path, 'stdout' or empty) Where to write the figure.
        #[clap(short, long, value_parser)]
        out: Option<String>,
        /// If passed as an argument, writes a standalone HTML page instead of the plotly JSON figure.
        #[clap(long, takes_value = false)]
        html: bool,
        /// (file path) A reference figure in JSON format. If provided, the rendered figure is
        /// checked against it.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
    /// Writes one figure per day in the output directory.
    Frames {
        /// (YYYY-MM-DD, optional) The last day to write. Defaults to all the days of the data.
        #[clap(long, value_parser)]
        until: Option<String>,
        #[clap(short, long, value_parser)]
        palette: Option<Palette>,
        #[clap(long, value_parser)]
        projection: Option<Projection>,
        /// (directory, default '.') Where to write the frames.
        #[clap(short, long, value_parser)]
        out_dir: Option<String>,
        /// (command line, optional) A command converting a figure into a PNG image, for example
        /// 'kaleido {input} {output}'.
        #[clap(long, value_parser)]
        raster_command: Option<String>,
    },
    /// Assembles the PNG frames of a directory into an animated GIF.
    Animate {
        /// (directory, default '.') The directory with the frames. The animation is written there too.
        #[clap(short, long, value_parser)]
        out_dir: Option<String>,
        /// The projection used for the frames. It is only used to name the animation.
        #[clap(long, value_parser)]
        projection: Option<Projection>,
    },
    /// Lists the days available in the data.
    Dates {
        #[clap(long, value_parser)]
        until: Option<String>,
    },
    /// Lists the palettes.
    Palettes,
}
