//! Built-in data-engineering term bank.

use crate::models::{Difficulty, NewCard};

struct SeedTerm {
    category: &'static str,
    difficulty: Difficulty,
    term: &'static str,
    definition: &'static str,
    example: &'static str,
}

const TERMS: &[SeedTerm] = &[
    // Common Quiz I
    SeedTerm {
        category: "Common Quiz I",
        difficulty: Difficulty::Basic,
        term: "ETL",
        definition: "Extract, Transform, Load: data is pulled from sources, reshaped, then written to the target store.",
        example: "A nightly job reads orders from Postgres, aggregates them and loads them into the warehouse.",
    },
    SeedTerm {
        category: "Common Quiz I",
        difficulty: Difficulty::Basic,
        term: "ELT",
        definition: "Extract, Load, Transform: raw data is loaded first and transformed inside the target system.",
        example: "Raw JSON events land in BigQuery and dbt models clean them afterwards.",
    },
    SeedTerm {
        category: "Common Quiz I",
        difficulty: Difficulty::Basic,
        term: "Data Lake",
        definition: "Central storage for raw data of any shape, kept in its native format until needed.",
        example: "Clickstream logs, CSV exports and images all stored in an S3 bucket.",
    },
    SeedTerm {
        category: "Common Quiz I",
        difficulty: Difficulty::Basic,
        term: "Data Warehouse",
        definition: "Structured store optimized for analytical queries over cleaned, integrated data.",
        example: "Snowflake tables that back the finance dashboards.",
    },
    SeedTerm {
        category: "Common Quiz I",
        difficulty: Difficulty::Intermediate,
        term: "Batch Processing",
        definition: "Processing a bounded set of accumulated records in one run.",
        example: "A Spark job that recomputes daily revenue at 2 a.m.",
    },
    SeedTerm {
        category: "Common Quiz I",
        difficulty: Difficulty::Intermediate,
        term: "Stream Processing",
        definition: "Continuous processing of unbounded data as records arrive.",
        example: "Flink computing a five-minute rolling count of failed logins.",
    },
    // Common Quiz II
    SeedTerm {
        category: "Common Quiz II",
        difficulty: Difficulty::Basic,
        term: "Schema on Read",
        definition: "Structure is applied when data is queried rather than when it is written.",
        example: "Athena defines a table over JSON files already sitting in S3.",
    },
    SeedTerm {
        category: "Common Quiz II",
        difficulty: Difficulty::Intermediate,
        term: "Partitioning",
        definition: "Splitting a dataset into segments by a key so queries can skip irrelevant data.",
        example: "Events stored under event_date=2024-01-01/ directories.",
    },
    SeedTerm {
        category: "Common Quiz II",
        difficulty: Difficulty::Intermediate,
        term: "Idempotency",
        definition: "Running an operation more than once has the same effect as running it once.",
        example: "A load step that MERGEs on a key instead of blindly INSERTing.",
    },
    SeedTerm {
        category: "Common Quiz II",
        difficulty: Difficulty::Intermediate,
        term: "Change Data Capture",
        definition: "Tracking row-level inserts, updates and deletes in a source database and propagating them downstream.",
        example: "Debezium reading the MySQL binlog into Kafka topics.",
    },
    SeedTerm {
        category: "Common Quiz II",
        difficulty: Difficulty::Advanced,
        term: "Exactly-Once Semantics",
        definition: "Guarantee that each record affects the output once, even across retries and failures.",
        example: "Kafka transactions combined with idempotent producers.",
    },
    SeedTerm {
        category: "Common Quiz II",
        difficulty: Difficulty::Advanced,
        term: "Backpressure",
        definition: "A consumer signalling upstream producers to slow down when it cannot keep up.",
        example: "A streaming sink pausing reads from the source while its buffer drains.",
    },
    // Data Modeling
    SeedTerm {
        category: "Data Modeling",
        difficulty: Difficulty::Basic,
        term: "Fact Table",
        definition: "Table holding measurable events, keyed by references to dimensions.",
        example: "fact_sales with quantity and amount per order line.",
    },
    SeedTerm {
        category: "Data Modeling",
        difficulty: Difficulty::Basic,
        term: "Dimension Table",
        definition: "Table of descriptive attributes used to filter and group facts.",
        example: "dim_customer with name, region and segment.",
    },
    SeedTerm {
        category: "Data Modeling",
        difficulty: Difficulty::Intermediate,
        term: "Star Schema",
        definition: "A fact table surrounded by denormalized dimension tables joined on surrogate keys.",
        example: "fact_sales joined to dim_date, dim_store and dim_product.",
    },
    SeedTerm {
        category: "Data Modeling",
        difficulty: Difficulty::Intermediate,
        term: "Surrogate Key",
        definition: "A system-generated identifier with no business meaning, used as a primary key.",
        example: "customer_sk as an auto-incrementing integer instead of an email address.",
    },
    SeedTerm {
        category: "Data Modeling",
        difficulty: Difficulty::Advanced,
        term: "Slowly Changing Dimension",
        definition: "Technique for tracking attribute changes in dimensions over time.",
        example: "SCD Type 2 adds a new row with valid_from/valid_to when a customer moves.",
    },
    SeedTerm {
        category: "Data Modeling",
        difficulty: Difficulty::Advanced,
        term: "Data Vault",
        definition: "Modeling approach splitting data into hubs, links and satellites for auditability.",
        example: "hub_customer, link_customer_order and sat_customer_details.",
    },
    // Pipelines & Orchestration
    SeedTerm {
        category: "Pipelines & Orchestration",
        difficulty: Difficulty::Basic,
        term: "DAG",
        definition: "Directed acyclic graph of tasks describing execution order and dependencies.",
        example: "An Airflow DAG where transform waits for both extract tasks.",
    },
    SeedTerm {
        category: "Pipelines & Orchestration",
        difficulty: Difficulty::Basic,
        term: "Orchestrator",
        definition: "System that schedules, runs and monitors pipeline tasks.",
        example: "Airflow, Dagster or Prefect triggering jobs on a cron.",
    },
    SeedTerm {
        category: "Pipelines & Orchestration",
        difficulty: Difficulty::Intermediate,
        term: "Backfill",
        definition: "Re-running a pipeline for past periods to fill gaps or apply new logic.",
        example: "Recomputing the last 90 days after fixing a currency bug.",
    },
    SeedTerm {
        category: "Pipelines & Orchestration",
        difficulty: Difficulty::Intermediate,
        term: "Data Lineage",
        definition: "Record of where data came from and which transformations produced it.",
        example: "A graph showing the revenue report depends on three raw tables.",
    },
    SeedTerm {
        category: "Pipelines & Orchestration",
        difficulty: Difficulty::Advanced,
        term: "Dead Letter Queue",
        definition: "Holding area for messages that repeatedly fail processing.",
        example: "Malformed events routed to a separate Kafka topic for inspection.",
    },
    SeedTerm {
        category: "Pipelines & Orchestration",
        difficulty: Difficulty::Advanced,
        term: "Data Contract",
        definition: "Agreement between producers and consumers on schema, semantics and quality of a dataset.",
        example: "A versioned schema that blocks deploys when a column is dropped.",
    },
];

/// The built-in term bank, every card in the learning state.
pub fn data_engineering_terms() -> Vec<NewCard> {
    TERMS
        .iter()
        .map(|t| {
            NewCard::new(t.category, t.term, t.definition)
                .with_difficulty(t.difficulty)
                .with_example(t.example)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardState;
    use std::collections::HashSet;

    #[test]
    fn test_terms_are_unique_and_learning() {
        let cards = data_engineering_terms();
        let terms: HashSet<_> = cards.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms.len(), cards.len());
        assert!(cards.iter().all(|c| c.state == CardState::Learning));
        assert!(cards.iter().all(|c| !c.example.is_empty()));
    }

    #[test]
    fn test_four_categories() {
        let categories: HashSet<_> = data_engineering_terms()
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(categories.len(), 4);
    }
}
