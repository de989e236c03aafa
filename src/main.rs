use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use svgr::{
    ExpandProps, ExportType, ItemInput, ItemOutput, JsxRuntime, Platform, Replacement, SvgProp,
    SvgrError, TransformOptions, load_config, run_items,
};

/// Everything that sets transform options, which `--items` supplies per item.
const ITEM_CONFLICTS: &[&str] = &[
    "inputs",
    "config",
    "name",
    "typescript",
    "native",
    "forward_ref",
    "memo",
    "title_prop",
    "desc_prop",
    "expand_props",
    "jsx_runtime",
    "named_export",
    "dimensions",
    "fill_current_color",
    "replace_attr_values",
    "svg_props",
    "no_svgo",
    "no_prettier",
];

#[derive(Parser)]
#[command(name = "svgr")]
#[command(about = "Turn SVG files into React components", long_about = None)]
struct Cli {
    /// Input SVG files (use - for stdin)
    #[arg(default_value = "-")]
    inputs: Vec<PathBuf>,

    /// Read a JSON array of items ({svgCode, componentName, options}) instead.
    /// Each item carries its own options, so option flags can't be combined with it.
    #[arg(long, conflicts_with_all = ITEM_CONFLICTS)]
    items: Option<PathBuf>,

    /// TOML file with transform options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Component name
    #[arg(short, long)]
    name: Option<String>,

    /// Emit TypeScript
    #[arg(long)]
    typescript: bool,

    /// Target react-native-svg
    #[arg(long)]
    native: bool,

    /// Wrap the component in forwardRef
    #[arg(long = "ref")]
    forward_ref: bool,

    /// Wrap the component in memo
    #[arg(long)]
    memo: bool,

    /// Add a title prop
    #[arg(long)]
    title_prop: bool,

    /// Add a desc prop
    #[arg(long)]
    desc_prop: bool,

    /// Where to spread props on the root element
    #[arg(long, value_enum)]
    expand_props: Option<PropsPlacement>,

    /// JSX runtime the generated module targets
    #[arg(long, value_enum)]
    jsx_runtime: Option<Runtime>,

    /// Use a named export instead of a default export
    #[arg(long)]
    named_export: bool,

    /// Keep width and height
    #[arg(long)]
    dimensions: bool,

    /// Replace all fills with currentColor
    #[arg(long)]
    fill_current_color: bool,

    /// Replace an attribute value, as FROM=TO (repeatable)
    #[arg(long = "replace-attr-value", value_name = "FROM=TO")]
    replace_attr_values: Vec<String>,

    /// Add an attribute to the root element, as NAME=VALUE (repeatable)
    #[arg(long = "svg-prop", value_name = "NAME=VALUE")]
    svg_props: Vec<String>,

    /// Skip the optimizer
    #[arg(long)]
    no_svgo: bool,

    /// Skip re-indenting the output
    #[arg(long)]
    no_prettier: bool,

    /// Print JSON result envelopes instead of code
    #[arg(long)]
    json: bool,

    /// Report failed items and keep going
    #[arg(long)]
    continue_on_fail: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PropsPlacement {
    Start,
    End,
    None,
}

#[derive(Clone, Copy, ValueEnum)]
enum Runtime {
    Classic,
    Automatic,
}

impl Cli {
    /// Config file values with command line flags on top.
    fn options(&self) -> Result<TransformOptions, SvgrError> {
        let mut options = match &self.config {
            Some(path) => load_config(path)?,
            None => TransformOptions::default(),
        };

        if let Some(name) = &self.name {
            options.component_name = name.clone();
        }
        options.typescript |= self.typescript;
        options.forward_ref |= self.forward_ref;
        options.memo |= self.memo;
        options.title_prop |= self.title_prop;
        options.desc_prop |= self.desc_prop;
        options.dimensions |= self.dimensions;
        options.add_fill_current_color |= self.fill_current_color;
        if self.native {
            options.platform = Platform::Native;
        }
        if self.named_export {
            options.export_type = ExportType::Named;
        }
        if self.no_svgo {
            options.svgo = false;
        }
        if self.no_prettier {
            options.prettier = false;
        }
        if let Some(placement) = self.expand_props {
            options.expand_props = match placement {
                PropsPlacement::Start => ExpandProps::Start,
                PropsPlacement::End => ExpandProps::End,
                PropsPlacement::None => ExpandProps::None,
            };
        }
        if let Some(runtime) = self.jsx_runtime {
            options.jsx_runtime = match runtime {
                Runtime::Classic => JsxRuntime::Classic,
                Runtime::Automatic => JsxRuntime::Automatic,
            };
        }

        options.replace_attr_values.extend(
            self.replace_attr_values
                .iter()
                .filter_map(|pair| pair.split_once('='))
                .map(|(from, to)| Replacement {
                    from: from.to_string(),
                    to: to.to_string(),
                }),
        );
        options.svg_props.extend(
            self.svg_props
                .iter()
                .filter_map(|pair| pair.split_once('='))
                .map(|(name, value)| SvgProp {
                    name: name.to_string(),
                    value: value.to_string(),
                }),
        );
        Ok(options)
    }
}

fn read_input(path: &Path) -> Result<String, SvgrError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|err| SvgrError::Io(path.to_path_buf(), err))?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(|err| SvgrError::Io(path.to_path_buf(), err))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("svgr=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let items: Vec<ItemInput> = match &cli.items {
        Some(path) => serde_json::from_str(&read_input(path)?)?,
        None => {
            let options = cli.options()?;
            cli.inputs
                .iter()
                .map(|path| -> Result<ItemInput, SvgrError> {
                    Ok(ItemInput {
                        svg_code: read_input(path)?,
                        component_name: None,
                        options: options.clone(),
                    })
                })
                .collect::<Result<_, SvgrError>>()?
        }
    };

    let results = run_items(&items, cli.continue_on_fail)?;

    let output = if cli.json {
        serde_json::to_string_pretty(&results)?
    } else {
        let mut chunks = Vec::new();
        for result in &results {
            match &result.json {
                ItemOutput::Generated { react_code, .. } => chunks.push(react_code.clone()),
                ItemOutput::Failed { error } => {
                    eprintln!("item {}: {error}", result.paired_item);
                }
            }
        }
        chunks.join("\n\n")
    };

    if cli.output.as_os_str() == "-" {
        let mut stdout = io::stdout();
        stdout.write_all(output.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        fs::write(&cli.output, format!("{output}\n"))?;
    }

    Ok(())
}
