//! Exploratory run 2: K-Means and PCA on the column-normalized table.
//!
//! Same pipeline as run 1, but every feature column is scaled to unit L2
//! norm before clustering, so no single column dominates the distance metric
//! by sheer magnitude.

use anyhow::Result;
use btc_clusters::data::FEATURE_NAMES;
use btc_clusters::utils::{bar_chart, line_chart, scatter_chart, wait_for_dismiss, SummaryStats};
use btc_clusters::{normalize_columns, KMeans, PcaAnalysis, PriceHistory};
use clap::Parser;

#[derive(Parser)]
#[command(name = "normalized")]
#[command(about = "K-Means / PCA study of the normalized BTC-USD daily series", long_about = None)]
struct Cli {
    /// Input CSV (Yahoo Finance daily export)
    #[arg(short, long, default_value = "BTC-USD_daily.csv")]
    input: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let history = PriceHistory::from_csv(&cli.input)?;

    println!("Loaded {} trading days from {}", history.n_days(), cli.input);
    if let Some((first, last)) = history.date_span() {
        println!("Span: {} .. {}", first, last);
    }

    // Scale each of the five columns to unit L2 norm; everything downstream
    // works on the normalized table
    let features = normalize_columns(&history.features);

    let avg_price = PriceHistory::average_price_of(&features);
    println!("\nAverage price series (normalized):");
    SummaryStats::from_data(&avg_price).print();

    line_chart(&avg_price, "BTC-USD linear scale", false);
    line_chart(&avg_price, "BTC-USD log scale", true);
    wait_for_dismiss();

    // K-Means with 2 and 5 clusters on the normalized table
    let kmeans_2 = KMeans::new(2).with_seed(0).with_n_init(10).fit(&features)?;
    let kmeans_5 = KMeans::new(5).with_seed(0).with_n_init(10).fit(&features)?;

    scatter_chart(&avg_price, &kmeans_2.labels, "KMeans 2 clusters");
    scatter_chart(&avg_price, &kmeans_5.labels, "KMeans 5 clusters");
    wait_for_dismiss();

    println!("This time, the clusters seem to be separated by price range.");
    println!("However, they are not perfectly separated by price range, which");
    println!("should mean that another parameter has been impacting the clustering.");

    // PCA to explain the clusters
    let pca = PcaAnalysis::fit(
        &features,
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
        "The first component explains {:.1}% of the variance in the data and",
        pca.explained_variance_ratio[0] * 100.0
    );
    println!(
        "the second component {:.1}%.",
        pca.explained_variance_ratio[1] * 100.0
    );
    println!("Now, let's see which dimension is impacting the most the variance in the data.");

    // Dump the full component matrix, then chart the first component
    pca.print_components();

    let feature_labels: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    bar_chart(
        &feature_labels,
        &pca.first_component().to_vec(),
        "PCA dimension impact",
    );
    wait_for_dismiss();

    println!("All dimensions are impacting the first principal component.");
    println!("The first four dimensions impact it the most and they are related to");
    println!("the price of BTC. But the fifth dimension, the volume, also impacts");
    println!("it, which could explain why the clusters are not perfectly separated");
    println!("by price range.");

    // k=5 clusters against price and against volume
    scatter_chart(&avg_price, &kmeans_5.labels, "KMeans 5 clusters (y-axis: price)");
    let volume = features.column(btc_clusters::data::VOLUME).to_owned();
    scatter_chart(&volume, &kmeans_5.labels, "KMeans 5 clusters (y-axis: volume)");
    wait_for_dismiss();

    println!("The points are clustered by price: the clusters are almost perfectly");
    println!("separated in groups of price range. The volume is not impacting the");
    println!("clustering much, since the clusters look quite random when plotted");
    println!("with the volume as y axis.");
    println!();
    println!("Conclusion: this clustering has not been useful because the clusters");
    println!("were only separating different price ranges. After normalization the");
    println!("price was the variable with the highest variance. Next time, we will");
    println!("use the variation of the price instead of the price itself.");

    Ok(())
}
