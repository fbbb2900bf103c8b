//! Fixed prompt templates

/// Asks for one SQL statement given a schema and a question
pub const SQL_SYNTHESIS_TEMPLATE: &str = "\
You are a SQL expert. Given the schema of the database and a natural language request, \
generate an accurate SQL query. Please provide only the SQL query with no additional text or explanation.

Database Schema:
{schema_info}

Natural Language Request:
{user_query}

SQL Query:
";

/// Merges the three branch results into one answer
pub const SUMMARY_TEMPLATE: &str = "\
User Query: {user_query}

{engine_a_label} Database Results:
{engine_a_results}

Vector Database Results:
{vector_results}

{engine_b_label} Database Results:
{engine_b_results}

Please provide a concise summary of the information above that addresses the user's query.
Your summary should be in clear and natural language that is easy for the user to understand.
";
