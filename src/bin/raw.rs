//! Exploratory run 1: K-Means and PCA on the raw BTC-USD feature table.
//!
//! Loads the daily series, plots the average price, clusters the raw
//! five-dimensional table with k=2 and k=5, then uses PCA to explain why the
//! clusters land where they do.

use anyhow::Result;
use btc_clusters::data::FEATURE_NAMES;
use btc_clusters::utils::{bar_chart, line_chart, scatter_chart, wait_for_dismiss, SummaryStats};
use btc_clusters::{KMeans, PcaAnalysis, PriceHistory};
use clap::Parser;

#[derive(Parser)]
#[command(name = "raw")]
#[command(about = "K-Means / PCA study of the raw BTC-USD daily series", long_about = None)]
struct Cli {
    /// Input CSV (Yahoo Finance daily export)
    #[arg(short, long, default_value = "BTC-USD_daily.csv")]
    input: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The export carries Date, Open, High, Low, Close, Adj Close, Volume;
    // the feature table keeps the five numeric columns Open, High, Low,
    // Close, Volume.
    let history = PriceHistory::from_csv(&cli.input)?;

    println!("Loaded {} trading days from {}", history.n_days(), cli.input);
    if let Some((first, last)) = history.date_span() {
        println!("Span: {} .. {}", first, last);
    }

    let avg_price = history.average_price();
    println!("\nAverage price series:");
    SummaryStats::from_data(&avg_price).print();

    // Average price in linear and log scale
    line_chart(&avg_price, "BTC-USD linear scale", false);
    line_chart(&avg_price, "BTC-USD log scale", true);
    wait_for_dismiss();

    // K-Means with 2 and 5 clusters on the raw table
    let kmeans_2 = KMeans::new(2).with_seed(0).with_n_init(10).fit(&history.features)?;
    let kmeans_5 = KMeans::new(5).with_seed(0).with_n_init(10).fit(&history.features)?;

    scatter_chart(&avg_price, &kmeans_2.labels, "KMeans 2 clusters");
    scatter_chart(&avg_price, &kmeans_5.labels, "KMeans 5 clusters");
    wait_for_dismiss();

    println!("The clusters seem to be quite random.");
    println!("We will have to dig deeper to understand what is happening.");

    // PCA to explain the clusters
    let pca = PcaAnalysis::fit(
        &history.features,
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    );

    let pc_labels: Vec<String> = (1..=pca.n_components).map(|i| format!("PC{}", i)).collect();
    bar_chart(
        &pc_labels,
        &pca.explained_variance_ratio.to_vec(),
        "PCA explained variance ratio",
    );
    wait_for_dismiss();

    println!(
        "The first component explains {:.1}% of the variance in the data.",
        pca.explained_variance_ratio[0] * 100.0
    );
    println!("Now, let's see which dimension is impacting the most the variance in the data.");

    // Impact of each original dimension on the first component
    let feature_labels: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    bar_chart(
        &feature_labels,
        &pca.first_component().to_vec(),
        "PCA dimension impact",
    );
    wait_for_dismiss();

    println!(
        "The {} dimension is the one impacting the most the first principal component,",
        pca.dominant_feature()
    );
    println!("hence almost all the variance in the data.");
    println!("To confirm this, let's plot the clusters using the volume as y axis.");

    // k=5 clusters against volume
    let volume = history.volume();
    scatter_chart(&volume, &kmeans_5.labels, "KMeans 5 clusters (y-axis: volume)");
    wait_for_dismiss();

    println!("The points are clustered by volume: the clusters are perfectly");
    println!("separated in groups of volume range. As expected, the volume is the");
    println!("most important feature to explain the clusters.");
    println!();
    println!("Conclusion: this clustering has not been useful because the clusters");
    println!("were only separating different price ranges. This happened because");
    println!("the volume is the variable which varies the most in absolute value,");
    println!("which is why the data has to be normalized before clustering.");

    Ok(())
}
